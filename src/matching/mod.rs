//! Cross-source entity matching.
//!
//! Sources never share identifiers, so records are reconciled by comparing
//! human-readable fields. A query is scored against every candidate; the
//! best-scoring candidate wins if it reaches the cutoff.

pub mod similarity;

use tracing::trace;

pub use similarity::{mean_ratio, ratio};

/// A field records can be compared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchField {
    Name,
    CountryCode,
    Position,
    HomeTeam,
    AwayTeam,
}

impl MatchField {
    /// Competitions, teams and lineup entries
    pub const NAME: &'static [MatchField] = &[MatchField::Name];

    /// Players: name alone is not discriminative enough in large pools
    pub const PERSON: &'static [MatchField] =
        &[MatchField::Name, MatchField::CountryCode, MatchField::Position];

    /// Fixtures on the same day
    pub const FIXTURE: &'static [MatchField] = &[MatchField::HomeTeam, MatchField::AwayTeam];
}

/// Exposes the comparable fields of a record. `None` means the source does
/// not know the value; such fields are left out of the score.
pub trait Matchable {
    fn field(&self, field: MatchField) -> Option<&str>;
}

impl<T: Matchable + ?Sized> Matchable for &T {
    fn field(&self, field: MatchField) -> Option<&str> {
        (**self).field(field)
    }
}

/// Candidate accepted by the matcher.
#[derive(Debug, PartialEq)]
pub struct Matched<'a, C> {
    pub candidate: &'a C,
    /// Position of the candidate in the sequence it was picked from
    pub index: usize,
    pub score: f64,
}

// Manual impls: a derive would require `C: Clone`/`C: Copy`.
impl<C> Clone for Matched<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Matched<'_, C> {}

/// Query together with the outcome of matching it.
#[derive(Debug)]
pub struct MatchedPair<'q, 'c, Q, C> {
    pub query: &'q Q,
    pub matched: Option<Matched<'c, C>>,
    /// Best score seen, whether or not it reached the cutoff
    pub score: f64,
}

/// Similarity of `candidate` to `query` over `fields`: the mean of the
/// per-field ratios of fields both records know. 0 when none are shared.
pub fn score<Q, C>(query: &Q, candidate: &C, fields: &[MatchField]) -> f64
where
    Q: Matchable + ?Sized,
    C: Matchable + ?Sized,
{
    mean_ratio(
        fields
            .iter()
            .filter_map(|f| Some((query.field(*f)?, candidate.field(*f)?))),
    )
}

/// Best candidate regardless of cutoff. Ties keep the earliest candidate.
fn rank<Q, C>(query: &Q, candidates: &[C], fields: &[MatchField]) -> Option<(usize, f64)>
where
    Q: Matchable + ?Sized,
    C: Matchable,
{
    let mut best: Option<(usize, f64)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let s = score(query, candidate, fields);
        if best.is_none_or(|(_, best_score)| s > best_score) {
            best = Some((index, s));
        }
    }
    best
}

/// Picks the candidate most similar to `query`.
///
/// Returns `None` when `candidates` is empty or the best score is below
/// `cutoff`. The result only depends on the inputs.
pub fn best_match<'c, Q, C>(
    query: &Q,
    candidates: &'c [C],
    fields: &[MatchField],
    cutoff: f64,
) -> Option<Matched<'c, C>>
where
    Q: Matchable + ?Sized,
    C: Matchable,
{
    let (index, score) = rank(query, candidates, fields)?;
    trace!(index, score, cutoff, "best candidate");
    (score >= cutoff).then(|| Matched {
        candidate: &candidates[index],
        index,
        score,
    })
}

/// Matches every query against the same candidate pool, in query order.
pub fn match_all<'q, 'c, Q, C>(
    queries: &'q [Q],
    candidates: &'c [C],
    fields: &[MatchField],
    cutoff: f64,
) -> Vec<MatchedPair<'q, 'c, Q, C>>
where
    Q: Matchable,
    C: Matchable,
{
    queries
        .iter()
        .map(|query| {
            let ranked = rank(query, candidates, fields);
            let matched = ranked
                .filter(|(_, score)| *score >= cutoff)
                .map(|(index, score)| Matched {
                    candidate: &candidates[index],
                    index,
                    score,
                });
            MatchedPair {
                query,
                matched,
                score: ranked.map_or(0.0, |(_, score)| score),
            }
        })
        .collect()
}

/// One-to-one matching: each candidate is claimed by at most one query.
///
/// Pairs at or above `cutoff` are assigned in descending score order, ties
/// going to the earlier query and then the earlier candidate. A query whose
/// candidates are all claimed by better-scoring queries gets `None`. The
/// result is in query order.
pub fn match_unique<'c, Q, C>(
    queries: &[Q],
    candidates: &'c [C],
    fields: &[MatchField],
    cutoff: f64,
) -> Vec<Option<Matched<'c, C>>>
where
    Q: Matchable,
    C: Matchable,
{
    let mut pairs: Vec<(usize, usize, f64)> = Vec::new();
    for (query_index, query) in queries.iter().enumerate() {
        for (index, candidate) in candidates.iter().enumerate() {
            let s = score(query, candidate, fields);
            if s >= cutoff {
                pairs.push((query_index, index, s));
            }
        }
    }
    pairs.sort_by(|a, b| {
        b.2.total_cmp(&a.2)
            .then(a.0.cmp(&b.0))
            .then(a.1.cmp(&b.1))
    });

    let mut assigned: Vec<Option<Matched<'c, C>>> = vec![None; queries.len()];
    let mut claimed = vec![false; candidates.len()];
    for (query_index, index, score) in pairs {
        if assigned[query_index].is_some() {
            continue;
        }
        if claimed[index] {
            trace!(query_index, index, score, "candidate already claimed");
            continue;
        }
        claimed[index] = true;
        assigned[query_index] = Some(Matched {
            candidate: &candidates[index],
            index,
            score,
        });
    }
    assigned
}
