use std::cmp::Ordering;

use tracing::debug;

use super::cost::round_cents;
use super::domain::CategoryKind;
use super::outcome::Warning;
use super::scoring::CategoryRanking;

/// One change to the picks: `slot` of ranking `ranking` is replaced by
/// candidate `substitute`, or dropped when there is none.
#[derive(Debug, Clone, Copy)]
struct Repick {
    ranking: usize,
    slot: usize,
    substitute: Option<usize>,
    score_loss: f64,
    savings: f64,
}

/// Monthly cost of the current picks, priced the way the estimator prices them.
fn picked_total(rankings: &[CategoryRanking<'_>]) -> f64 {
    round_cents(
        rankings
            .iter()
            .flat_map(|ranking| ranking.selected())
            .map(|candidate| round_cents(candidate.monthly_cost))
            .sum(),
    )
}

/// Trade picks for cheaper eligible candidates until the total fits under
/// `ceiling`. Each step swaps one pick for the best-ranked cheaper candidate
/// of its category, taking the swap that loses the least score; once no swap
/// is left, surplus multi-select picks are dropped. Returns one warning per
/// change. The picks may still exceed the ceiling when it cannot be met.
pub(crate) fn fit_to_ceiling(
    rankings: &mut [CategoryRanking<'_>],
    ceiling: f64,
) -> Vec<Warning> {
    let mut changes = Vec::new();

    while picked_total(rankings) > ceiling {
        let Some(step) = cheapest_swap(rankings).or_else(|| cheapest_drop(rankings)) else {
            break;
        };

        let ranking = &mut rankings[step.ranking];
        let replaced = ranking.candidates[ranking.picks()[step.slot]]
            .service
            .id
            .clone();
        let substitute = step
            .substitute
            .map(|index| ranking.candidates[index].service.id.clone());
        debug!(
            category = %ranking.category,
            replaced = %replaced,
            substitute = ?substitute,
            score_loss = step.score_loss,
            "repicked to meet hard budget"
        );

        changes.push(Warning::BudgetReselection {
            category: ranking.category,
            replaced,
            substitute,
            monthly_savings: round_cents(step.savings),
        });
        ranking.repick(step.slot, step.substitute);
    }

    changes
}

fn cheapest_swap(rankings: &[CategoryRanking<'_>]) -> Option<Repick> {
    let mut steps = Vec::new();

    for (ranking_index, ranking) in rankings.iter().enumerate() {
        let picks = ranking.picks();
        for (slot, &pick) in picks.iter().enumerate() {
            let current = &ranking.candidates[pick];
            let cheaper = ranking
                .candidates
                .iter()
                .enumerate()
                .filter(|(index, _)| !picks.contains(index))
                .find(|(_, candidate)| candidate.monthly_cost < current.monthly_cost);

            if let Some((index, candidate)) = cheaper {
                steps.push(Repick {
                    ranking: ranking_index,
                    slot,
                    substitute: Some(index),
                    score_loss: current.total - candidate.total,
                    savings: current.monthly_cost - candidate.monthly_cost,
                });
            }
        }
    }

    steps.into_iter().min_by(least_damage)
}

fn cheapest_drop(rankings: &[CategoryRanking<'_>]) -> Option<Repick> {
    rankings
        .iter()
        .enumerate()
        .filter(|(_, ranking)| matches!(ranking.kind, CategoryKind::MultiSelect { .. }))
        .filter(|(_, ranking)| ranking.picks().len() > 1)
        .filter_map(|(ranking_index, ranking)| {
            let slot = ranking.picks().len() - 1;
            let dropped = &ranking.candidates[ranking.picks()[slot]];
            (dropped.monthly_cost > 0.0).then_some(Repick {
                ranking: ranking_index,
                slot,
                substitute: None,
                score_loss: dropped.total,
                savings: dropped.monthly_cost,
            })
        })
        .min_by(least_damage)
}

/// Smallest score loss first, then the larger saving. Earlier steps win ties.
fn least_damage(left: &Repick, right: &Repick) -> Ordering {
    left.score_loss
        .total_cmp(&right.score_loss)
        .then_with(|| right.savings.total_cmp(&left.savings))
}
