//! Park statistics: visitor histories, road heat and financial reports.
//!
//! [`ParkStats`] accumulates as the park runs.  The financial and per-venue
//! reports are computed on demand from the grid, since the venues already
//! carry their own totals.

use std::collections::BTreeMap;

use pk_agent::{DisposeReason, Visitor};
use pk_core::{AgentId, Demographic, GridPos, Tick};
use pk_spatial::Grid;
use pk_venue::{Building, RideState};

use crate::Departure;

// ── Visitor history ───────────────────────────────────────────────────────────

/// One finished visit.
#[derive(Clone, Debug, PartialEq)]
pub struct VisitRecord {
    pub agent:             AgentId,
    pub demographic:       Demographic,
    pub entered_at:        Tick,
    pub left_at:           Tick,
    pub spend:             f64,
    pub departure:         Departure,
    /// Left because every remaining ride had too long a line.
    pub without_tolerance: bool,
}

impl VisitRecord {
    /// Ticks spent in the park.
    pub fn stay(&self) -> u64 {
        self.left_at.since(self.entered_at)
    }
}

#[derive(Debug, Default)]
pub struct ParkStats {
    /// Visitor-ticks spent walking from each road tile.
    road_heat: BTreeMap<GridPos, u64>,
    visits:    Vec<VisitRecord>,
    pub spawned:                  u64,
    pub exited_without_tolerance: u64,
    pub stranded:                 u64,
}

impl ParkStats {
    pub(crate) fn record_walk(&mut self, pos: GridPos) {
        *self.road_heat.entry(pos).or_insert(0) += 1;
    }

    pub(crate) fn record_departure(&mut self, visitor: &Visitor, now: Tick, departure: Departure) {
        if visitor.exited_without_tolerance {
            self.exited_without_tolerance += 1;
        }
        if departure == Departure::Disposed(DisposeReason::Stranded) {
            self.stranded += 1;
        }
        self.visits.push(VisitRecord {
            agent:             visitor.id,
            demographic:       visitor.demographic,
            entered_at:        visitor.entered_at,
            left_at:           now,
            spend:             visitor.spend,
            departure,
            without_tolerance: visitor.exited_without_tolerance,
        });
    }

    /// Walking visitor-ticks recorded on `pos`.
    pub fn heat(&self, pos: GridPos) -> u64 {
        self.road_heat.get(&pos).copied().unwrap_or(0)
    }

    /// Road tiles with any traffic, in `GridPos` order.
    pub fn road_heatmap(&self) -> impl Iterator<Item = (GridPos, u64)> + '_ {
        self.road_heat.iter().map(|(p, n)| (*p, *n))
    }

    pub fn visits(&self) -> &[VisitRecord] {
        &self.visits
    }

    fn of(&self, demographic: Demographic) -> impl Iterator<Item = &VisitRecord> {
        self.visits.iter().filter(move |v| v.demographic == demographic)
    }

    /// Stay lengths of finished visits by `demographic`, in departure order.
    pub fn time_in_park(&self, demographic: Demographic) -> Vec<u64> {
        self.of(demographic).map(VisitRecord::stay).collect()
    }

    /// Spend of finished visits by `demographic`, in departure order.
    pub fn money_spent(&self, demographic: Demographic) -> Vec<f64> {
        self.of(demographic).map(|v| v.spend).collect()
    }

    pub fn mean_stay(&self, demographic: Demographic) -> Option<f64> {
        let stays = self.time_in_park(demographic);
        (!stays.is_empty()).then(|| stays.iter().sum::<u64>() as f64 / stays.len() as f64)
    }
}

// ── Finance ───────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FinanceReport {
    /// Road tiles plus every venue's cost so far.
    pub total_cost:       f64,
    /// Road tiles plus installation costs.
    pub fixed_cost:       f64,
    /// Running costs accrued by venues.
    pub operational_cost: f64,
    pub total_revenue:    f64,
    /// Ticks until fixed costs are recovered at the current operating profit
    /// rate; `None` while that rate is not positive.
    pub break_even:       Option<f64>,
}

impl FinanceReport {
    pub fn collect(grid: &Grid<Building>, now: Tick) -> Self {
        let mut report = FinanceReport::default();
        for (_, b) in grid.occupied() {
            let fixed = b.fixed_cost();
            let total = b.total_cost();
            report.fixed_cost += fixed;
            report.total_cost += total;
            report.operational_cost += total - fixed;
            report.total_revenue += b.revenue();
        }
        report.break_even = break_even(report.fixed_cost, report.total_revenue - report.operational_cost, now);
        report
    }

    pub fn net(&self) -> f64 {
        self.total_revenue - self.total_cost
    }
}

fn break_even(fixed: f64, operating_profit: f64, now: Tick) -> Option<f64> {
    if now.0 == 0 {
        return None;
    }
    let rate = operating_profit / now.as_f64();
    let ticks = fixed / rate;
    (rate > 0.0 && ticks.is_finite()).then_some(ticks)
}

// ── Venue reports ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct RideReport {
    pub pos:       GridPos,
    pub subtype:   String,
    pub state:     RideState,
    pub queue:     usize,
    pub ridership: u64,
    pub revenue:   f64,
    pub profit:    f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StandReport {
    pub pos:     GridPos,
    pub subtype: String,
    pub traffic: u64,
    pub revenue: f64,
    pub profit:  f64,
}

/// Every attraction on the grid, row-major.
pub fn ride_reports(grid: &Grid<Building>) -> Vec<RideReport> {
    grid.occupied()
        .filter_map(|(pos, b)| b.as_attraction().map(|a| (pos, a)))
        .map(|(pos, a)| RideReport {
            pos,
            subtype:   a.subtype.clone(),
            state:     a.state,
            queue:     a.queue_len(),
            ridership: a.ridership,
            revenue:   a.revenue,
            profit:    a.profit(),
        })
        .collect()
}

/// Every concession on the grid, row-major.
pub fn stand_reports(grid: &Grid<Building>) -> Vec<StandReport> {
    grid.occupied()
        .filter_map(|(pos, b)| b.as_concession().map(|c| (pos, c)))
        .map(|(pos, c)| StandReport {
            pos,
            subtype: c.subtype.clone(),
            traffic: c.traffic,
            revenue: c.revenue,
            profit:  c.profit(),
        })
        .collect()
}
