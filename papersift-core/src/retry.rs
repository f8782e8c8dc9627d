//! Bounded retry of the items a pass could not resolve.
//!
//! A pass classifies a set of items and hands back the subset it could not
//! classify. That subset is fed through the pass again, with one less unit of
//! budget each time, until nothing is left or the budget runs out. What happens
//! to the leftovers is the caller's [`Exhaustion`] policy.

use std::fmt::Display;

use crate::PaperSiftError;

/// Accumulated result of one or more passes.
pub trait PassOutput: Default + Send {
    type Item;

    fn merge(&mut self, other: Self);

    /// Absorb items the pass never resolved as if they had been kept.
    fn keep_unresolved(&mut self, items: Vec<Self::Item>);
}

pub struct PassResult<T, O> {
    pub output: O,
    pub unresolved: Vec<T>,
}

#[async_trait::async_trait]
pub trait ResolvingPass<T: Send + 'static>: Send + Sync {
    type Output: PassOutput<Item = T>;

    async fn run_pass(
        &self,
        items: Vec<T>,
    ) -> Result<PassResult<T, Self::Output>, PaperSiftError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exhaustion {
    /// Leftovers are kept: losing a possibly relevant item is worse than a
    /// false positive.
    FailOpen,
    /// Leftovers are excluded from the output and returned to the caller.
    FailClosed,
}

pub struct Resolved<T, O> {
    pub output: O,
    /// Items still unresolved under [`Exhaustion::FailClosed`]; always empty
    /// under [`Exhaustion::FailOpen`].
    pub unresolved: Vec<T>,
}

pub async fn resolve_with_retry<T, P>(
    pass: &P,
    items: Vec<T>,
    budget: usize,
    policy: Exhaustion,
) -> Result<Resolved<T, P::Output>, PaperSiftError>
where
    T: Display + Send + 'static,
    P: ResolvingPass<T> + ?Sized,
{
    let mut output = P::Output::default();
    let mut pending = items;
    let mut remaining = budget;

    loop {
        if pending.is_empty() {
            return Ok(Resolved {
                output,
                unresolved: Vec::new(),
            });
        }

        let PassResult {
            output: pass_output,
            unresolved,
        } = pass.run_pass(pending).await?;
        output.merge(pass_output);

        if unresolved.is_empty() {
            return Ok(Resolved {
                output,
                unresolved,
            });
        }

        if remaining == 0 {
            let labels: Vec<String> = unresolved.iter().map(ToString::to_string).collect();
            return Ok(match policy {
                Exhaustion::FailOpen => {
                    tracing::warn!(
                        count = unresolved.len(),
                        items = ?labels,
                        "retry budget exhausted, keeping unresolved items"
                    );
                    output.keep_unresolved(unresolved);
                    Resolved {
                        output,
                        unresolved: Vec::new(),
                    }
                }
                Exhaustion::FailClosed => {
                    tracing::error!(
                        count = unresolved.len(),
                        items = ?labels,
                        "retry budget exhausted, items left unresolved"
                    );
                    Resolved {
                        output,
                        unresolved,
                    }
                }
            });
        }

        remaining -= 1;
        tracing::info!(
            count = unresolved.len(),
            retries_left = remaining,
            "retrying unresolved items"
        );
        pending = unresolved;
    }
}
