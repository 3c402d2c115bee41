use crate::config::SearchConfig;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{MuxError, MuxResult};
use crate::search::candidate::{Candidate, build_candidates};

/// Produces an encoded file for one candidate.
pub trait CandidateEncoder {
    fn encode(&mut self, candidate: &Candidate) -> MuxResult<Vec<u8>>;
}

impl<F> CandidateEncoder for F
where
    F: FnMut(&Candidate) -> MuxResult<Vec<u8>>,
{
    fn encode(&mut self, candidate: &Candidate) -> MuxResult<Vec<u8>> {
        self(candidate)
    }
}

/// Result of a size search.
#[derive(Clone, Debug)]
pub struct FitOutcome {
    pub bytes: Vec<u8>,
    pub candidate: Candidate,
    /// `false` when no candidate fit and the smallest output was returned instead.
    pub within_budget: bool,
    /// Encoder invocations, failed ones included.
    pub attempts: usize,
}

impl FitOutcome {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Score threshold above which candidates are hopeless after an oversized encode.
///
/// Returns `None` while the overage stays within `overage_margin`.
pub fn skip_target(score: f64, size: u64, budget: u64, cfg: &SearchConfig) -> Option<f64> {
    if budget == 0 || size == 0 {
        return None;
    }
    let ratio = budget as f64 / size as f64;
    if ratio >= 1.0 / (1.0 + cfg.overage_margin) {
        return None;
    }
    Some(score * ratio.powf(cfg.skip_damping))
}

/// Cursor over score-sorted candidates.
///
/// Callers alternate [`FitSearch::next_candidate`] and [`FitSearch::observe`]
/// until a fit is returned or candidates run out, then call [`FitSearch::finish`].
#[derive(Debug)]
pub struct FitSearch<'a> {
    candidates: &'a [Candidate],
    budget: u64,
    cfg: &'a SearchConfig,
    cursor: usize,
    attempts: usize,
    skipped: usize,
    smallest: Option<(Candidate, Vec<u8>)>,
}

impl<'a> FitSearch<'a> {
    pub fn new(candidates: &'a [Candidate], budget: u64, cfg: &'a SearchConfig) -> Self {
        Self {
            candidates,
            budget,
            cfg,
            cursor: 0,
            attempts: 0,
            skipped: 0,
            smallest: None,
        }
    }

    pub fn next_candidate(&self) -> Option<&'a Candidate> {
        self.candidates.get(self.cursor)
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Candidates passed over without encoding.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Record the encode result for the current candidate and advance.
    pub fn observe(&mut self, result: MuxResult<Vec<u8>>) -> Option<FitOutcome> {
        let candidate = *self.candidates.get(self.cursor)?;
        self.cursor += 1;
        self.attempts += 1;

        let bytes = match result {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(%candidate, error = %err, "candidate encode failed");
                return None;
            }
        };

        let size = bytes.len() as u64;
        if size <= self.budget {
            self.cursor = self.candidates.len();
            return Some(FitOutcome {
                bytes,
                candidate,
                within_budget: true,
                attempts: self.attempts,
            });
        }

        tracing::debug!(%candidate, size, budget = self.budget, "candidate over budget");

        if let Some(target) = skip_target(candidate.score, size, self.budget, self.cfg) {
            let rest = &self.candidates[self.cursor..];
            let skip = rest.partition_point(|c| c.score > target);
            if skip > 0 {
                tracing::debug!(skip, target, "skipping candidates unlikely to fit");
            }
            self.cursor += skip;
            self.skipped += skip;
        }

        if self
            .smallest
            .as_ref()
            .is_none_or(|(_, best)| bytes.len() < best.len())
        {
            self.smallest = Some((candidate, bytes));
        }
        None
    }

    /// Smallest oversized output seen, or an error if every encode failed.
    pub fn finish(self) -> MuxResult<FitOutcome> {
        match self.smallest {
            Some((candidate, bytes)) => Ok(FitOutcome {
                bytes,
                candidate,
                within_budget: false,
                attempts: self.attempts,
            }),
            None if self.attempts == 0 => Err(MuxError::search("no candidates to try")),
            None => Err(MuxError::search(format!(
                "all {} attempted candidates failed to encode",
                self.attempts
            ))),
        }
    }
}

/// Find the highest-scoring candidate whose encode fits in `budget_bytes`.
#[tracing::instrument(skip(encoder, cfg))]
pub fn fit_to_budget<E>(
    encoder: &mut E,
    base_fps: Fps,
    canvas: Canvas,
    budget_bytes: u64,
    cfg: &SearchConfig,
) -> MuxResult<FitOutcome>
where
    E: CandidateEncoder + ?Sized,
{
    if budget_bytes == 0 {
        return Err(MuxError::validation("budget must be non-zero"));
    }
    let candidates = build_candidates(base_fps, canvas, cfg)?;
    let mut search = FitSearch::new(&candidates, budget_bytes, cfg);

    while let Some(candidate) = search.next_candidate() {
        let result = encoder.encode(candidate);
        if let Some(outcome) = search.observe(result) {
            tracing::info!(
                candidate = %outcome.candidate,
                size = outcome.size(),
                attempts = outcome.attempts,
                "found candidate within budget"
            );
            return Ok(outcome);
        }
    }

    let skipped = search.skipped();
    let outcome = search.finish()?;
    tracing::warn!(
        candidate = %outcome.candidate,
        size = outcome.size(),
        budget = budget_bytes,
        attempts = outcome.attempts,
        skipped,
        "no candidate fit the budget; returning smallest output"
    );
    Ok(outcome)
}

#[cfg(test)]
#[path = "../../tests/unit/search/fit.rs"]
mod tests;
