//! 人脸匹配适配层 (Identity matcher)
//!
//! 外部比对器给出容差内的所有候选, 本层在候选中取距离最小者,
//! 距离相同时取注册顺序最靠前的人员。

use super::identity::IdentitySet;
use crate::detection::Embedding;

/// 默认匹配容差 (特征距离)
pub const DEFAULT_TOLERANCE: f32 = 0.6;

/// 容差内的候选人员
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub index: usize,
    pub distance: f32,
}

/// 人脸特征比对器 (外部人脸识别子系统)
pub trait FaceComparator {
    /// 返回与查询特征距离在容差内的所有已注册特征
    fn candidates(
        &self,
        known: &[Embedding],
        query: &Embedding,
        tolerance: f32,
    ) -> Vec<Candidate>;
}

/// 欧氏距离比对
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanComparator;

impl FaceComparator for EuclideanComparator {
    fn candidates(
        &self,
        known: &[Embedding],
        query: &Embedding,
        tolerance: f32,
    ) -> Vec<Candidate> {
        known
            .iter()
            .enumerate()
            .filter_map(|(index, embedding)| {
                let distance = embedding.distance(query)?;
                (distance <= tolerance).then_some(Candidate { index, distance })
            })
            .collect()
    }
}

/// 匹配到的人员
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityMatch {
    pub index: usize,
    pub name: String,
    pub distance: f32,
}

impl IdentityMatch {
    /// 显示用置信度 `(1 - distance) * 100`, 限制在 [0, 100]
    pub fn confidence(&self) -> f32 {
        ((1.0 - self.distance) * 100.0).clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Unknown,
    Matched(IdentityMatch),
}

impl MatchOutcome {
    pub fn identity(&self) -> Option<&IdentityMatch> {
        match self {
            MatchOutcome::Matched(m) => Some(m),
            MatchOutcome::Unknown => None,
        }
    }
}

pub struct IdentityMatcher<C = EuclideanComparator> {
    comparator: C,
    tolerance: f32,
}

impl IdentityMatcher<EuclideanComparator> {
    pub fn new(tolerance: f32) -> Self {
        Self::with_comparator(EuclideanComparator, tolerance)
    }
}

impl Default for IdentityMatcher<EuclideanComparator> {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl<C: FaceComparator> IdentityMatcher<C> {
    pub fn with_comparator(comparator: C, tolerance: f32) -> Self {
        Self {
            comparator,
            tolerance,
        }
    }

    /// 在容差内候选中选出最佳匹配
    pub fn best_match(&self, identities: &IdentitySet, query: &Embedding) -> MatchOutcome {
        if let Some(dimension) = identities.dimension() {
            if query.len() != dimension {
                log::warn!(
                    "⚠️ 人脸特征维度 {} 与特征库维度 {} 不一致, 视为未识别",
                    query.len(),
                    dimension
                );
                return MatchOutcome::Unknown;
            }
        }

        let mut best: Option<Candidate> = None;
        for candidate in self
            .comparator
            .candidates(identities.embeddings(), query, self.tolerance)
        {
            if candidate.distance.is_nan() || candidate.index >= identities.len() {
                continue;
            }
            let better = match best {
                None => true,
                Some(b) => {
                    candidate.distance < b.distance
                        || (candidate.distance == b.distance && candidate.index < b.index)
                }
            };
            if better {
                best = Some(candidate);
            }
        }

        match best.and_then(|b| identities.name(b.index).map(|name| (b, name))) {
            Some((b, name)) => MatchOutcome::Matched(IdentityMatch {
                index: b.index,
                name: name.to_string(),
                distance: b.distance,
            }),
            None => MatchOutcome::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identities() -> IdentitySet {
        IdentitySet::new(vec![
            ("alice".to_string(), Embedding::new(vec![0.0, 0.0])),
            ("bob".to_string(), Embedding::new(vec![1.0, 0.0])),
            ("carol".to_string(), Embedding::new(vec![0.0, 1.0])),
        ])
        .unwrap()
    }

    /// 以固定顺序返回预设候选
    struct Scripted(Vec<Candidate>);

    impl FaceComparator for Scripted {
        fn candidates(&self, _: &[Embedding], _: &Embedding, _: f32) -> Vec<Candidate> {
            self.0.clone()
        }
    }

    #[test]
    fn test_picks_minimum_distance() {
        let matcher = IdentityMatcher::new(0.6);
        let outcome = matcher.best_match(&identities(), &Embedding::new(vec![0.9, 0.1]));
        let m = outcome.identity().unwrap();
        assert_eq!(m.name, "bob");
        assert_eq!(m.index, 1);
    }

    #[test]
    fn test_outside_tolerance_is_unknown() {
        let matcher = IdentityMatcher::new(0.6);
        let outcome = matcher.best_match(&identities(), &Embedding::new(vec![5.0, 5.0]));
        assert_eq!(outcome, MatchOutcome::Unknown);
    }

    #[test]
    fn test_tie_breaks_on_lowest_index() {
        // (0.5, 0.5) 与 bob、carol 等距
        let matcher = IdentityMatcher::new(0.8);
        let set = IdentitySet::new(vec![
            ("bob".to_string(), Embedding::new(vec![1.0, 0.0])),
            ("carol".to_string(), Embedding::new(vec![0.0, 1.0])),
        ])
        .unwrap();
        for _ in 0..10 {
            let outcome = matcher.best_match(&set, &Embedding::new(vec![0.5, 0.5]));
            assert_eq!(outcome.identity().unwrap().name, "bob");
        }
    }

    #[test]
    fn test_tie_break_independent_of_candidate_order() {
        let comparator = Scripted(vec![
            Candidate { index: 2, distance: 0.3 },
            Candidate { index: 1, distance: 0.3 },
            Candidate { index: 0, distance: 0.5 },
        ]);
        let matcher = IdentityMatcher::with_comparator(comparator, 0.6);
        let outcome = matcher.best_match(&identities(), &Embedding::new(vec![0.0, 0.0]));
        assert_eq!(outcome.identity().unwrap().name, "bob");
    }

    #[test]
    fn test_empty_identities_is_unknown() {
        let matcher: IdentityMatcher = IdentityMatcher::default();
        let outcome = matcher.best_match(&IdentitySet::empty(), &Embedding::new(vec![0.0]));
        assert_eq!(outcome, MatchOutcome::Unknown);
    }

    #[test]
    fn test_dimension_mismatch_is_unknown() {
        let matcher = IdentityMatcher::new(10.0);
        let outcome = matcher.best_match(&identities(), &Embedding::new(vec![0.0, 0.0, 0.0]));
        assert_eq!(outcome, MatchOutcome::Unknown);
    }

    #[test]
    fn test_confidence_clamped() {
        let near = IdentityMatch {
            index: 0,
            name: "alice".into(),
            distance: 0.25,
        };
        assert!((near.confidence() - 75.0).abs() < 1e-4);

        let far = IdentityMatch { distance: 1.4, ..near };
        assert_eq!(far.confidence(), 0.0);
    }
}
