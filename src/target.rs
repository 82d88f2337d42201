//! Dartboard targets: typed scoring regions and point classification.
//!
//! A target is an ordered list of beds; [`Target::classify`] returns the
//! hit data of the first bed containing the point, so overlapping beds
//! resolve by declaration order. Points outside every bed are a miss,
//! `HitData { hit_type: Normal, diff: 0 }`.
//!
//! The text format accepted by [`Target::from_reader`] is whitespace
//! separated: a bed count, then per bed `score vertex_count color_token
//! type_token` followed by `vertex_count` coordinate pairs. The color token
//! is ignored, an unrecognized type token reads as `normal`, and the score
//! magnitude is stored negated (beds deduct points).

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::DartsError;
use crate::geometry::{Polygon, Vec2};

/// Score change produced by a hit; non-positive for scoring beds.
pub type StateDiff = i32;

/// Which kind of ring a bed belongs to. The ordering (`Normal < Double <
/// Treble`) is part of the hit-distribution output contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HitType {
    Normal,
    Double,
    Treble,
}

/// A typed score delta. Ordered by type, then by delta, which is the fixed
/// ordering of hit-distribution entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HitData {
    pub hit_type: HitType,
    pub diff: StateDiff,
}

impl HitData {
    pub const MISS: HitData = HitData {
        hit_type: HitType::Normal,
        diff: 0,
    };

    pub fn new(hit_type: HitType, diff: StateDiff) -> Self {
        Self { hit_type, diff }
    }
}

/// One scoring region: a polygon plus the hit it awards.
#[derive(Clone, Debug)]
pub struct Bed {
    shape: Polygon,
    hit: HitData,
}

impl Bed {
    pub fn new(shape: Polygon, hit: HitData) -> Self {
        Self { shape, hit }
    }

    pub fn shape(&self) -> &Polygon {
        &self.shape
    }

    pub fn hit(&self) -> HitData {
        self.hit
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.shape.contains(p)
    }
}

/// An ordered collection of beds.
#[derive(Clone, Debug)]
pub struct Target {
    beds: Vec<Bed>,
}

impl Target {
    /// Fails on an empty bed list, a bed with fewer than 3 vertices, or a
    /// bed whose delta would add points instead of removing them.
    pub fn new(beds: Vec<Bed>) -> Result<Self, DartsError> {
        if beds.is_empty() {
            return Err(DartsError::EmptyTarget);
        }
        for (index, bed) in beds.iter().enumerate() {
            let got = bed.shape.vertices().len();
            if got < 3 {
                return Err(DartsError::DegenerateBed { index, got });
            }
            if bed.hit.diff > 0 {
                return Err(DartsError::PositiveBedDiff {
                    index,
                    diff: bed.hit.diff,
                });
            }
        }
        Ok(Self { beds })
    }

    pub fn beds(&self) -> &[Bed] {
        &self.beds
    }

    /// First bed containing `p`, or a miss.
    pub fn classify(&self, p: Vec2) -> HitData {
        for bed in &self.beds {
            if bed.contains(p) {
                return bed.hit();
            }
        }
        HitData::MISS
    }

    /// Parse the whitespace-separated target format from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DartsError> {
        let mut text = String::new();
        BufReader::new(reader).read_to_string(&mut text)?;
        let mut tokens = TokenStream::new(&text);

        let num_beds: usize = tokens.parse("bed count")?;
        let mut beds = Vec::with_capacity(num_beds);
        for _ in 0..num_beds {
            beds.push(parse_bed(&mut tokens)?);
        }
        Target::new(beds)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DartsError> {
        Target::from_reader(File::open(path)?)
    }
}

fn parse_bed(tokens: &mut TokenStream<'_>) -> Result<Bed, DartsError> {
    let score: i32 = tokens.parse("bed score")?;
    let num_points: usize = tokens.parse("vertex count")?;
    tokens.next("color token")?; // discarded
    let type_token = tokens.next("type token")?;
    let hit_type = match type_token {
        "double" => HitType::Double,
        "treble" => HitType::Treble,
        _ => HitType::Normal,
    };

    let mut vertices = Vec::with_capacity(num_points);
    for _ in 0..num_points {
        let x: f64 = tokens.parse("vertex x")?;
        let y: f64 = tokens.parse("vertex y")?;
        vertices.push(Vec2::new(x, y));
    }
    Ok(Bed::new(
        Polygon::new(vertices),
        HitData::new(hit_type, -score),
    ))
}

/// Whitespace tokenizer that remembers its position for diagnostics.
struct TokenStream<'a> {
    tokens: std::str::SplitWhitespace<'a>,
    position: usize,
}

impl<'a> TokenStream<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            tokens: text.split_whitespace(),
            position: 0,
        }
    }

    fn next(&mut self, expected: &'static str) -> Result<&'a str, DartsError> {
        self.position += 1;
        self.tokens.next().ok_or(DartsError::Parse {
            expected,
            position: self.position,
        })
    }

    fn parse<T: std::str::FromStr>(&mut self, expected: &'static str) -> Result<T, DartsError> {
        let position = self.position + 1;
        self.next(expected)?
            .parse()
            .map_err(|_| DartsError::Parse { expected, position })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_bed(center: Vec2, half: f64, hit: HitData) -> Bed {
        Bed::new(
            Polygon::new(vec![
                Vec2::new(center.x - half, center.y - half),
                Vec2::new(center.x + half, center.y - half),
                Vec2::new(center.x + half, center.y + half),
                Vec2::new(center.x - half, center.y + half),
            ]),
            hit,
        )
    }

    #[test]
    fn test_classify_first_match_wins() {
        let inner = square_bed(Vec2::ZERO, 1.0, HitData::new(HitType::Double, -50));
        let outer = square_bed(Vec2::ZERO, 3.0, HitData::new(HitType::Normal, -20));
        let target = Target::new(vec![inner, outer]).unwrap();

        assert_eq!(
            target.classify(Vec2::new(0.5, 0.5)),
            HitData::new(HitType::Double, -50)
        );
        assert_eq!(
            target.classify(Vec2::new(2.0, 2.0)),
            HitData::new(HitType::Normal, -20)
        );
        assert_eq!(target.classify(Vec2::new(10.0, 0.0)), HitData::MISS);
    }

    #[test]
    fn test_empty_target_rejected() {
        assert!(matches!(Target::new(vec![]), Err(DartsError::EmptyTarget)));
    }

    #[test]
    fn test_degenerate_bed_rejected() {
        let bad = Bed::new(
            Polygon::new(vec![Vec2::ZERO, Vec2::new(1.0, 0.0)]),
            HitData::MISS,
        );
        assert!(matches!(
            Target::new(vec![bad]),
            Err(DartsError::DegenerateBed { index: 0, got: 2 })
        ));
    }

    #[test]
    fn test_hit_data_ordering() {
        assert!(HitType::Normal < HitType::Double);
        assert!(HitType::Double < HitType::Treble);
        assert!(HitData::new(HitType::Normal, -20) < HitData::new(HitType::Normal, 0));
        assert!(HitData::new(HitType::Normal, 0) < HitData::new(HitType::Double, -40));
    }

    #[test]
    fn test_parse_round_target() {
        let text = "\
2
20 4 white normal
-2 -2 2 -2 2 2 -2 2
40 3 red double
5 5 7 5 6 7
";
        let target = Target::from_reader(text.as_bytes()).unwrap();
        assert_eq!(target.beds().len(), 2);
        assert_eq!(target.beds()[0].hit(), HitData::new(HitType::Normal, -20));
        assert_eq!(target.beds()[1].hit(), HitData::new(HitType::Double, -40));
        assert_eq!(target.beds()[1].shape().vertices().len(), 3);
        assert!(target.beds()[0].contains(Vec2::ZERO));
    }

    #[test]
    fn test_positive_diff_rejected() {
        let bad = square_bed(Vec2::ZERO, 1.0, HitData::new(HitType::Normal, 20));
        assert!(matches!(
            Target::new(vec![bad]),
            Err(DartsError::PositiveBedDiff { index: 0, diff: 20 })
        ));
    }

    #[test]
    fn test_parse_unknown_type_reads_as_normal() {
        let text = "1\n10 3 green wedge\n0 0 1 0 0 1\n";
        let target = Target::from_reader(text.as_bytes()).unwrap();
        assert_eq!(target.beds()[0].hit().hit_type, HitType::Normal);
    }

    #[test]
    fn test_parse_truncated_input_fails() {
        let text = "1\n10 4 green normal\n0 0 1 0 0 1\n";
        let err = Target::from_reader(text.as_bytes());
        assert!(matches!(err, Err(DartsError::Parse { .. })));
    }
}
