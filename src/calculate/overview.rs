//! Company-wide record and per-player lifetime numbers.

use super::totals::{average_kill_participation, compute_totals};
use crate::models::{
    player_key, CompanyOverview, LegacyRecord, Outcome, PlayerAverages, PlayerProfile,
    PlayerRecord, War,
};

/// Win/loss record and long-run averages.
///
/// Every loaded war counts toward the record, with the legacy record added
/// on top. Averages only look at full wars: counters are per full war and
/// KP is the mean over all full-war rows. Returns `None` when no wars are
/// loaded.
pub fn company_overview(wars: &[&War], legacy: LegacyRecord) -> Option<CompanyOverview> {
    if wars.is_empty() {
        return None;
    }

    let count = |outcome: Outcome| wars.iter().filter(|w| w.outcome == outcome).count() as u32;

    let full: Vec<&War> = wars.iter().copied().filter(|w| w.is_full()).collect();
    let rows: Vec<&PlayerRecord> = full.iter().flat_map(|w| w.players.iter()).collect();
    let totals = compute_totals(rows.iter().copied());
    let per_war = |sum: u64| {
        if full.is_empty() {
            0.0
        } else {
            sum as f64 / full.len() as f64
        }
    };

    Some(CompanyOverview {
        wars: wars.len() as u32 + legacy.wars,
        wins: count(Outcome::Win) + legacy.wins,
        losses: count(Outcome::Loss) + legacy.losses,
        full_wars: full.len() as u32,
        avg_kills: per_war(totals.kills),
        avg_deaths: per_war(totals.deaths),
        avg_damage: per_war(totals.damage),
        avg_healing: per_war(totals.healing),
        avg_kill_participation: average_kill_participation(rows.iter().copied()),
    })
}

/// Wars played by a player plus lifetime averages over their full wars.
///
/// Lifetime counters are divided by the number of full wars the player
/// appears in; KP is the mean of their rows. `lifetime` is `None` when the
/// player never appears in a full war.
pub fn player_profile(wars: &[&War], name: &str) -> PlayerProfile {
    let key = player_key(name);

    let played: Vec<&War> = wars
        .iter()
        .copied()
        .filter(|w| w.contains_player(&key))
        .collect();

    let full: Vec<&War> = played.iter().copied().filter(|w| w.is_full()).collect();
    let key_ref = key.as_str();
    let rows: Vec<&PlayerRecord> = full
        .iter()
        .flat_map(|w| w.players.iter().filter(move |p| p.key() == key_ref))
        .collect();

    let lifetime = (!rows.is_empty()).then(|| {
        let n = full.len() as f64;
        let totals = compute_totals(rows.iter().copied());
        PlayerAverages {
            avg_kills: totals.kills as f64 / n,
            avg_deaths: totals.deaths as f64 / n,
            avg_assists: totals.assists as f64 / n,
            avg_damage: totals.damage as f64 / n,
            avg_healing: totals.healing as f64 / n,
            avg_kill_participation: average_kill_participation(rows.iter().copied()),
        }
    });

    let display_name = played
        .first()
        .and_then(|w| w.find_player(&key))
        .map(|p| p.player.clone())
        .unwrap_or_else(|| name.trim().to_string());

    PlayerProfile {
        player: display_name,
        wars_played: played.len(),
        wars: played.iter().map(|w| w.file.clone()).collect(),
        lifetime,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{parse_war, CsvDialect};

    fn wars() -> Vec<War> {
        vec![
            parse_war(
                "MGvK6_11-18-25.csv",
                "Player,Kills,Deaths,Damage,Healing,KP %,Result
Amy,10,2,5000,0,40,Victory
Bob,2,1,100,8000,20,Victory
",
                CsvDialect::Legacy,
            ),
            parse_war(
                "MGvOppo_11-10-25.csv",
                "Player,Kills,Deaths,Damage,Healing,KP %,Result
amy,4,4,3000,0,30,Defeat
",
                CsvDialect::Legacy,
            ),
            parse_war(
                "MGvRival_10-01-25.csv",
                "Player,Kills,Deaths,Damage,Healing,KP %,Result,Full
Amy,50,0,90000,0,90,Defeat,no
Cat,1,1,1,1,1,Defeat,yes
",
                CsvDialect::Legacy,
            ),
        ]
    }

    #[test]
    fn test_company_overview() {
        let wars = wars();
        let refs: Vec<&War> = wars.iter().collect();
        let overview = company_overview(&refs, LegacyRecord::default()).unwrap();

        assert_eq!(overview.wars, 7);
        assert_eq!(overview.wins, 2);
        assert_eq!(overview.losses, 5);
        assert_eq!(overview.full_wars, 2);
        // 16 kills over 2 full wars
        assert_eq!(overview.avg_kills, 8.0);
        assert_eq!(overview.avg_damage, 4050.0);
        // KP is the mean over the 3 full-war rows
        assert_eq!(overview.avg_kill_participation, 30.0);
    }

    #[test]
    fn test_company_overview_without_legacy() {
        let wars = wars();
        let refs: Vec<&War> = wars.iter().collect();
        let overview = company_overview(&refs, LegacyRecord::NONE).unwrap();
        assert_eq!(overview.wars, 3);
        assert_eq!(overview.wins, 1);
        assert_eq!(overview.losses, 2);
    }

    #[test]
    fn test_company_overview_empty() {
        assert!(company_overview(&[], LegacyRecord::default()).is_none());
    }

    #[test]
    fn test_company_overview_no_full_wars() {
        let war = parse_war(
            "partial.csv",
            "Player,Kills,Full\nAmy,3,no\n",
            CsvDialect::Legacy,
        );
        let overview = company_overview(&[&war], LegacyRecord::NONE).unwrap();
        assert_eq!(overview.full_wars, 0);
        assert_eq!(overview.avg_kills, 0.0);
        assert_eq!(overview.avg_kill_participation, 0.0);
    }

    #[test]
    fn test_player_profile() {
        let wars = wars();
        let refs: Vec<&War> = wars.iter().collect();
        let profile = player_profile(&refs, " AMY ");

        assert_eq!(profile.player, "Amy");
        assert_eq!(profile.wars_played, 3);
        let lifetime = profile.lifetime.unwrap();
        // partial Rival war is left out
        assert_eq!(lifetime.avg_kills, 7.0);
        assert_eq!(lifetime.avg_damage, 4000.0);
        assert_eq!(lifetime.avg_kill_participation, 35.0);
    }

    #[test]
    fn test_player_profile_unknown_player() {
        let wars = wars();
        let refs: Vec<&War> = wars.iter().collect();
        let profile = player_profile(&refs, "Zed");
        assert_eq!(profile.wars_played, 0);
        assert!(profile.wars.is_empty());
        assert!(profile.lifetime.is_none());
    }

    #[test]
    fn test_player_profile_partial_only() {
        let wars = wars();
        let refs: Vec<&War> = wars[2..].iter().collect();
        let profile = player_profile(&refs, "Amy");
        assert_eq!(profile.wars_played, 1);
        assert!(profile.lifetime.is_none());
    }
}
