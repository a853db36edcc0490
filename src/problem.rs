//! Problem directories as written by the question generator: `NNN/question.md`
//! and, once answered, `NNN/solution.md` next to it.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use derivative::Derivative;
use tehai::Tile;
use tehai::codec::glyph_to_tile;

pub const QUESTION_FILE: &str = "question.md";
pub const SOLUTION_FILE: &str = "solution.md";

const TITLE_PREFIX: &str = "# 何切る問題 - ";
const DIFFICULTY_KEY: &str = "**難易度**:";
const THEME_KEY: &str = "**テーマ**:";
const HAND_HEADING: &str = "## あなたの手牌";
const CLAIM_KEY: &str = "現在の形:";
const DORA_KEY: &str = "- ドラ表示牌:";
/// Own river, then shimocha, toimen and kamicha.
const RIVER_KEYS: [&str; 4] = ["**自分**:", "**下家**:", "**対面**:", "**上家**:"];

#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct Problem {
    pub number: u32,
    pub date: Option<String>,
    /// Out of 10.
    pub difficulty: Option<u8>,
    pub theme: Option<String>,
    /// Contents of the hand code block, still in glyphs.
    pub hand: String,
    /// Dora indicator and every river, all tiles the player can see
    /// besides the hand.
    pub visible: Vec<Tile>,
    /// Shanten the solution claims for the hand, if there is a solution and
    /// its claim could be read.
    pub claim: Option<i8>,
    /// Raw solution document.
    #[derivative(Debug = "ignore")]
    pub solution: Option<String>,
}

impl Problem {
    pub fn load(dir: &Path) -> Result<Self> {
        let number = dir_number(dir).with_context(|| format!("{} is not a problem directory", dir.display()))?;

        let question_path = dir.join(QUESTION_FILE);
        let question =
            fs::read_to_string(&question_path).with_context(|| format!("failed to read {}", question_path.display()))?;

        let solution_path = dir.join(SOLUTION_FILE);
        let solution = if solution_path.is_file() {
            let s = fs::read_to_string(&solution_path)
                .with_context(|| format!("failed to read {}", solution_path.display()))?;
            Some(s)
        } else {
            log::debug!("problem {number:03} has no solution yet");
            None
        };

        Self::parse(number, &question, solution)
    }

    pub fn parse(number: u32, question: &str, solution: Option<String>) -> Result<Self> {
        let Some(hand) = hand_block(question) else {
            bail!("problem {number:03} has no hand block under {HAND_HEADING:?}");
        };
        let hand = hand.to_owned();
        let claim = solution.as_deref().and_then(claimed_shanten);
        if solution.is_some() && claim.is_none() {
            log::warn!("problem {number:03}: could not read the claimed shanten from the solution");
        }

        Ok(Self {
            number,
            date: date(question).map(str::to_owned),
            difficulty: difficulty(question),
            theme: theme(question).map(str::to_owned),
            hand,
            visible: visible(question),
            claim,
            solution,
        })
    }
}

/// Directory of problem `number` under `root`.
#[must_use]
pub fn problem_dir(root: &Path, number: u32) -> PathBuf {
    root.join(format!("{number:03}"))
}

/// Every problem directory under `root` with its number, ordered by number.
/// Anything whose name is not a number is skipped.
pub fn discover(root: &Path) -> Result<Vec<(u32, PathBuf)>> {
    let entries = fs::read_dir(root).with_context(|| format!("failed to list {}", root.display()))?;
    let mut dirs = vec![];
    for entry in entries {
        let path = entry.with_context(|| format!("failed to list {}", root.display()))?.path();
        if !path.is_dir() {
            continue;
        }
        match dir_number(&path) {
            Some(number) => dirs.push((number, path)),
            None => log::debug!("skipping {}", path.display()),
        }
    }
    dirs.sort_unstable_by_key(|&(number, _)| number);
    Ok(dirs)
}

fn dir_number(dir: &Path) -> Option<u32> {
    let name = dir.file_name()?.to_str()?;
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

fn value_after<'a>(doc: &'a str, key: &str) -> Option<&'a str> {
    doc.lines()
        .find_map(|line| line.trim().strip_prefix(key))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn date(question: &str) -> Option<&str> {
    value_after(question, TITLE_PREFIX).filter(|d| {
        let b = d.as_bytes();
        b.len() == 10
            && b.iter()
                .enumerate()
                .all(|(i, c)| if i == 4 || i == 7 { *c == b'-' } else { c.is_ascii_digit() })
    })
}

/// `★★★★★☆☆☆☆☆ (5/10)`
fn difficulty(question: &str) -> Option<u8> {
    let value = value_after(question, DIFFICULTY_KEY)?;
    let (_, rest) = value.rsplit_once('(')?;
    let (n, _) = rest.split_once("/10)")?;
    n.trim().parse().ok().filter(|n| (1..=10).contains(n))
}

fn theme(question: &str) -> Option<&str> {
    value_after(question, THEME_KEY)
}

/// Tiles on the dora indicator line and the river lines. Anything that is
/// not a tile glyph (separators, riichi markers, ...) is skipped.
fn visible(question: &str) -> Vec<Tile> {
    let mut tiles = vec![];
    for key in std::iter::once(DORA_KEY).chain(RIVER_KEYS) {
        if let Some(value) = value_after(question, key) {
            tiles.extend(value.chars().filter_map(glyph_to_tile));
        }
    }
    tiles
}

/// The first fenced block after the hand heading.
fn hand_block(question: &str) -> Option<&str> {
    let mut lines = question.lines().skip_while(|line| line.trim() != HAND_HEADING).skip(1);
    lines.find(|line| line.trim_start().starts_with("```"))?;
    let hand = lines
        .take_while(|line| !line.trim_start().starts_with("```"))
        .map(str::trim)
        .find(|line| !line.is_empty())?;
    Some(hand)
}

/// Reads `- 現在の形: ...` from a solution.
pub fn claimed_shanten(solution: &str) -> Option<i8> {
    solution
        .lines()
        .find_map(|line| line.split_once(CLAIM_KEY).map(|(_, v)| v))
        .and_then(parse_claim)
}

const CLAIM_WORDS: [(&str, i8); 7] = [
    ("和了", -1),
    ("アガリ", -1),
    ("テンパイ", 0),
    ("聴牌", 0),
    ("イーシャンテン", 1),
    ("リャンシャンテン", 2),
    ("サンシャンテン", 3),
];

const SHANTEN_SUFFIXES: [&str; 2] = ["シャンテン", "向聴"];

/// Shanten named in free text. When several terms appear, the one written
/// first wins.
pub fn parse_claim(text: &str) -> Option<i8> {
    let mut best: Option<(usize, i8)> = None;
    let mut consider = |pos: usize, value: i8| {
        if best.is_none_or(|(p, _)| pos < p) {
            best = Some((pos, value));
        }
    };

    for (word, value) in CLAIM_WORDS {
        if let Some(pos) = text.find(word) {
            consider(pos, value);
        }
    }

    let chars = text.char_indices().collect::<Vec<_>>();
    let mut i = 0;
    while i < chars.len() {
        let (start, c) = chars[i];
        if digit_value(c).is_none() {
            i += 1;
            continue;
        }
        let mut n = 0_u32;
        let mut j = i;
        while let Some(d) = chars.get(j).and_then(|&(_, c)| digit_value(c)) {
            n = n.saturating_mul(10).saturating_add(d);
            j += 1;
        }
        let end = chars.get(j).map_or(text.len(), |&(pos, _)| pos);
        let rest = &text[end..];
        if SHANTEN_SUFFIXES.iter().any(|s| rest.starts_with(s)) {
            if let Ok(value) = i8::try_from(n) {
                consider(start, value);
            }
        }
        i = j;
    }

    best.map(|(_, value)| value)
}

fn digit_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => c.to_digit(10),
        '０'..='９' => Some(c as u32 - '０' as u32),
        '一' => Some(1),
        '二' => Some(2),
        '三' => Some(3),
        '四' => Some(4),
        '五' => Some(5),
        '六' => Some(6),
        _ => None,
    }
}
