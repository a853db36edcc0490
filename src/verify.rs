//! Checks every problem's claimed shanten against the engine.
use crate::problem::Problem;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use console::{Alignment, pad_str, style};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use tehai::hand::count;
use tehai::{HandQuery, ShantenResult, Tile};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    Match,
    Mismatch,
    /// There is no solution yet, or its claim could not be read.
    Unclaimed,
    Invalid(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub number: u32,
    pub date: Option<String>,
    pub difficulty: Option<u8>,
    pub theme: Option<String>,
    pub has_solution: bool,
    pub claim: Option<i8>,
    pub result: Option<ShantenResult>,
    /// Only filled for tenpai hands.
    pub waits: Vec<Tile>,
    /// Unseen copies of `waits`, with the hand, the rivers and the dora
    /// indicator counted as seen.
    pub acceptance: u8,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Default, Serialize)]
pub struct Summary {
    pub matched: usize,
    pub mismatched: usize,
    pub unclaimed: usize,
    pub invalid: usize,
}

#[derive(Debug, Serialize)]
pub struct Report {
    /// Problems looked at, before filtering.
    pub total: usize,
    pub summary: Summary,
    pub verdicts: Vec<Verdict>,
}

/// Narrows a run down to some problems. Problems that cannot be loaded have
/// no theme or difficulty to match and are always reported.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    /// Substring of the theme.
    pub theme: Option<String>,
    pub difficulty: Option<u8>,
}

impl Filter {
    #[must_use]
    pub fn matches(&self, problem: &Problem) -> bool {
        let theme_ok = self
            .theme
            .as_deref()
            .is_none_or(|t| problem.theme.as_deref().is_some_and(|theme| theme.contains(t)));
        let difficulty_ok = self.difficulty.is_none_or(|d| problem.difficulty == Some(d));
        theme_ok && difficulty_ok
    }
}

/// Shanten in words, the way the table prints it.
pub struct Describe(pub i8);

impl fmt::Display for Describe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            -1 => f.write_str("agari"),
            0 => f.write_str("tenpai"),
            n => write!(f, "{n}-shanten"),
        }
    }
}

impl Verdict {
    fn unchecked(number: u32, outcome: Outcome) -> Self {
        Self {
            number,
            date: None,
            difficulty: None,
            theme: None,
            has_solution: false,
            claim: None,
            result: None,
            waits: vec![],
            acceptance: 0,
            outcome,
        }
    }

    fn about(problem: &Problem, outcome: Outcome) -> Self {
        Self {
            date: problem.date.clone(),
            difficulty: problem.difficulty,
            theme: problem.theme.clone(),
            has_solution: problem.solution.is_some(),
            claim: problem.claim,
            ..Self::unchecked(problem.number, outcome)
        }
    }
}

pub fn check(problem: &Problem) -> Verdict {
    let number = problem.number;
    log::trace!("checking {problem:?}");

    let query = tehai::decode(&problem.hand).and_then(|tiles| {
        let query = HandQuery::shanten(&tiles)?;
        ensure_tile_set(&tiles, &problem.visible)?;
        Ok(query)
    });
    let query = match query {
        Ok(q) => q,
        Err(e) => {
            log::debug!("problem {number:03}: {e:#}");
            return Verdict::about(problem, Outcome::Invalid(format!("{e:#}")));
        }
    };

    let result = query.resolve();
    let (waits, acceptance) = if result.shanten == 0 {
        (query.waits().to_vec(), query.acceptance(&problem.visible))
    } else {
        (vec![], 0)
    };

    let outcome = match problem.claim {
        None => Outcome::Unclaimed,
        Some(claim) if claim == result.shanten => Outcome::Match,
        Some(claim) => {
            log::info!(
                "problem {number:03}: solution says {}, hand is {} ({:?})",
                Describe(claim),
                Describe(result.shanten),
                result.family,
            );
            Outcome::Mismatch
        }
    };

    Verdict {
        result: Some(result),
        waits,
        acceptance,
        ..Verdict::about(problem, outcome)
    }
}

/// A hand and everything visible around it never hold more than the four
/// physical copies of a kind.
fn ensure_tile_set(hand: &[Tile], visible: &[Tile]) -> Result<()> {
    let seen = count(&[hand, visible].concat());
    if let Some((tile, &n)) = Tile::ALL.iter().zip(&seen).find(|&(_, &n)| n > 4) {
        bail!("{n} copies of {tile} between the hand, the rivers and the dora indicator");
    }
    Ok(())
}

/// Loads and checks a single problem directory. Failing to load is an
/// `Invalid` verdict, not an error. `None` if the problem is filtered out.
pub fn check_dir(dir: &Path, number: u32, filter: &Filter) -> Option<Verdict> {
    match Problem::load(dir) {
        Ok(problem) if filter.matches(&problem) => Some(check(&problem)),
        Ok(_) => {
            log::debug!("problem {number:03} filtered out");
            None
        }
        Err(e) => {
            log::debug!("{}: {e:#}", dir.display());
            Some(Verdict::unchecked(number, Outcome::Invalid(format!("{e:#}"))))
        }
    }
}

/// Checks `dirs` (paired with their problem numbers) in parallel.
pub fn run(dirs: &[(u32, PathBuf)], filter: &Filter, show_progress: bool) -> Result<Report> {
    if dirs.is_empty() {
        bail!("no problems to verify");
    }

    let pb = if show_progress {
        ProgressBar::new(dirs.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} problems")?
            .progress_chars("=>-"),
    );

    let verdicts = dirs
        .par_iter()
        .progress_with(pb.clone())
        .filter_map(|(number, dir)| check_dir(dir, *number, filter))
        .collect::<Vec<_>>();
    pb.finish_and_clear();

    let mut summary = Summary::default();
    for v in &verdicts {
        match v.outcome {
            Outcome::Match => summary.matched += 1,
            Outcome::Mismatch => summary.mismatched += 1,
            Outcome::Unclaimed => summary.unclaimed += 1,
            Outcome::Invalid(_) => summary.invalid += 1,
        }
    }

    Ok(Report {
        total: dirs.len(),
        summary,
        verdicts,
    })
}

impl Report {
    /// No problem disagrees with the engine and every hand could be read.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.summary.mismatched == 0 && self.summary.invalid == 0
    }

    pub fn print_table(&self) {
        println!(
            "{} {} {} {} {} {} {} {}",
            pad_str("No.", 4, Alignment::Left, None),
            pad_str("Date", 10, Alignment::Left, None),
            pad_str("Diff", 5, Alignment::Left, None),
            pad_str("Sol", 3, Alignment::Left, None),
            pad_str("Theme", 20, Alignment::Left, None),
            pad_str("Claim", 12, Alignment::Left, None),
            pad_str("Engine", 28, Alignment::Left, None),
            "Outcome",
        );
        for v in &self.verdicts {
            let claim = v.claim.map_or_else(|| "-".to_owned(), |c| Describe(c).to_string());
            let engine = match &v.result {
                Some(r) => format!("{} ({:?})", Describe(r.shanten), r.family),
                None => "-".to_owned(),
            };
            let outcome = match &v.outcome {
                Outcome::Match => style("match".to_owned()).green(),
                Outcome::Mismatch => style("MISMATCH".to_owned()).red().bold(),
                Outcome::Unclaimed if v.has_solution => style("unclaimed (unreadable)".to_owned()).dim(),
                Outcome::Unclaimed => style("unclaimed (no solution)".to_owned()).dim(),
                Outcome::Invalid(reason) => style(format!("invalid: {reason}")).yellow(),
            };
            let difficulty = v.difficulty.map_or_else(|| "?".to_owned(), |d| format!("{d}/10"));
            let solution = if v.has_solution { "✓" } else { "✗" };
            println!(
                "{:03}  {} {} {} {} {} {} {outcome}",
                v.number,
                pad_str(v.date.as_deref().unwrap_or("-"), 10, Alignment::Left, None),
                pad_str(&difficulty, 5, Alignment::Left, None),
                pad_str(solution, 3, Alignment::Left, None),
                pad_str(v.theme.as_deref().unwrap_or("-"), 20, Alignment::Left, Some("…")),
                pad_str(&claim, 12, Alignment::Left, None),
                pad_str(&engine, 28, Alignment::Left, None),
            );
            if !v.waits.is_empty() {
                let waits = v.waits.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ");
                println!("     {}", style(format!("waits {waits} ({} left)", v.acceptance)).dim());
            }
        }

        let s = &self.summary;
        println!();
        println!("{} of {} problems shown", self.verdicts.len(), self.total);
        println!(
            "{} matched, {} mismatched, {} unclaimed, {} invalid",
            style(s.matched).green(),
            style(s.mismatched).red(),
            s.unclaimed,
            style(s.invalid).yellow(),
        );
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::problem::test::{QUESTION, SOLUTION};
    use crate::problem::{QUESTION_FILE, SOLUTION_FILE, discover, problem_dir};
    use std::fs;
    use tehai::Family;

    fn write_problem(root: &Path, number: u32, question: &str, solution: Option<&str>) {
        let dir = problem_dir(root, number);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(QUESTION_FILE), question).unwrap();
        if let Some(solution) = solution {
            fs::write(dir.join(SOLUTION_FILE), solution).unwrap();
        }
    }

    #[test]
    fn tenpai_problem_matches() {
        let problem = Problem::parse(1, QUESTION, Some(SOLUTION.to_owned())).unwrap();
        let verdict = check(&problem);
        assert_eq!(verdict.outcome, Outcome::Match);
        assert_eq!(
            verdict.result,
            Some(ShantenResult {
                shanten: 0,
                family: Family::Standard,
            }),
        );
        assert_eq!(verdict.waits, vec!["9p".parse::<Tile>().unwrap()]);
        assert_eq!(verdict.acceptance, 3);
    }

    #[test]
    fn wrong_claim_mismatches() {
        let solution = SOLUTION.replace("テンパイ", "イーシャンテン");
        let problem = Problem::parse(1, QUESTION, Some(solution)).unwrap();
        assert_eq!(check(&problem).outcome, Outcome::Mismatch);

        let problem = Problem::parse(1, QUESTION, None).unwrap();
        assert_eq!(check(&problem).outcome, Outcome::Unclaimed);
    }

    #[test]
    fn unreadable_hands_are_invalid() {
        // a stray symbol in the hand
        let question = QUESTION.replace("🀡\n```", "🀡x\n```");
        let problem = Problem::parse(1, &question, Some(SOLUTION.to_owned())).unwrap();
        assert!(matches!(check(&problem).outcome, Outcome::Invalid(_)));

        // only 12 tiles
        let question = QUESTION.replace("🀋🀋🀋🀡", "🀋🀋🀋");
        let problem = Problem::parse(1, &question, None).unwrap();
        let verdict = check(&problem);
        assert!(matches!(&verdict.outcome, Outcome::Invalid(reason) if reason.contains("13")));
        assert_eq!(verdict.result, None);
    }

    #[test]
    fn run_over_directory() {
        let root = tempfile::tempdir().unwrap();
        write_problem(root.path(), 1, QUESTION, Some(SOLUTION));
        write_problem(root.path(), 2, QUESTION, None);
        write_problem(root.path(), 10, QUESTION, Some(&SOLUTION.replace("テンパイ", "2シャンテン")));
        fs::create_dir(root.path().join("drafts")).unwrap();

        let dirs = discover(root.path()).unwrap();
        assert_eq!(dirs.iter().map(|&(n, _)| n).collect::<Vec<_>>(), [1, 2, 10]);

        let report = run(&dirs, &Filter::default(), false).unwrap();
        let outcomes = report.verdicts.iter().map(|v| (v.number, v.outcome.clone())).collect::<Vec<_>>();
        assert_eq!(
            outcomes,
            [(1, Outcome::Match), (2, Outcome::Unclaimed), (10, Outcome::Mismatch)],
        );
        assert_eq!(report.summary.mismatched, 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn missing_directory_is_invalid() {
        let root = tempfile::tempdir().unwrap();
        let verdict = check_dir(&problem_dir(root.path(), 5), 5, &Filter::default()).unwrap();
        assert_eq!(verdict.number, 5);
        assert!(matches!(verdict.outcome, Outcome::Invalid(_)));

        run(&[], &Filter::default(), false).unwrap_err();
    }

    #[test]
    fn visible_tiles_lower_acceptance() {
        // the last 9p shows up in the own river
        let question = QUESTION.replace("**自分**: 🀀🀁🀏", "**自分**: 🀀🀁🀡");
        let problem = Problem::parse(1, &question, Some(SOLUTION.to_owned())).unwrap();
        let verdict = check(&problem);
        assert_eq!(verdict.outcome, Outcome::Match);
        assert_eq!(verdict.acceptance, 2);
    }

    #[test]
    fn fifth_copy_across_rivers_is_invalid() {
        // three 5m in hand, two more in a river
        let question = QUESTION.replace("**自分**: 🀀🀁🀏", "**自分**: 🀀🀋🀋");
        let problem = Problem::parse(1, &question, Some(SOLUTION.to_owned())).unwrap();
        let verdict = check(&problem);
        assert!(matches!(&verdict.outcome, Outcome::Invalid(reason) if reason.contains("5m")));

        ensure_tile_set(&tehai::hand::parse_tiles("5555m").unwrap(), &[]).unwrap();
        ensure_tile_set(&tehai::hand::parse_tiles("555m").unwrap(), &tehai::hand::parse_tiles("55m").unwrap())
            .unwrap_err();
    }

    #[test]
    fn filters() {
        let root = tempfile::tempdir().unwrap();
        write_problem(root.path(), 1, QUESTION, Some(SOLUTION));
        let push_fold = QUESTION.replace("リーチ判断", "押し引き").replace("★★★★★☆☆☆☆☆ (5/10)", "★★★☆☆☆☆☆☆☆ (3/10)");
        write_problem(root.path(), 2, &push_fold, Some(SOLUTION));
        let late_riichi = QUESTION.replace("(5/10)", "(7/10)");
        write_problem(root.path(), 3, &late_riichi, None);
        let dirs = discover(root.path()).unwrap();

        let numbers = |filter: Filter| {
            let report = run(&dirs, &filter, false).unwrap();
            assert_eq!(report.total, 3);
            report.verdicts.iter().map(|v| v.number).collect::<Vec<_>>()
        };
        assert_eq!(numbers(Filter::default()), [1, 2, 3]);
        assert_eq!(
            numbers(Filter {
                theme: Some("リーチ".to_owned()),
                difficulty: None,
            }),
            [1, 3],
        );
        assert_eq!(
            numbers(Filter {
                theme: None,
                difficulty: Some(3),
            }),
            [2],
        );
        assert_eq!(
            numbers(Filter {
                theme: Some("リーチ".to_owned()),
                difficulty: Some(7),
            }),
            [3],
        );
        assert!(numbers(Filter {
            theme: Some("鳴き判断".to_owned()),
            difficulty: None,
        })
        .is_empty());
    }

    #[test]
    fn report_json() {
        let problem = Problem::parse(1, QUESTION, Some(SOLUTION.to_owned())).unwrap();
        let json = serde_json::to_value(check(&problem)).unwrap();
        assert_eq!(json["outcome"], "match");
        assert_eq!(json["result"]["family"], "standard");
        assert_eq!(json["waits"][0], "9p");
    }
}
