#![forbid(unsafe_code)]

//! Selection controller.
//!
//! [`Chart`] owns everything a running visualization needs: the dataset, the
//! municipality groups, the scales (built once), the ownership colors, the
//! scene and the virtual clock. It has exactly two entry points that change
//! state: [`Chart::on_selection_changed`] for input and [`Chart::advance`]
//! for time.

use std::time::Duration;

use tracing::{debug, info};
use vacplot_core::{
    ConfigurationError, DEFAULT_PALETTE, Dataset, Groups, LegendEntry, OrdinalColors, PlotArea,
    Record, RecordId, Rgb, Scales,
};

use crate::diff::KeyedDiff;
use crate::reconcile::Reconciler;
use crate::scene::{Scene, VisualAttrs};
use crate::scheduler::Scheduler;
use crate::transition::{StageTimer, TransitionConfig};

/// Rank-based opacity: the first `full_rank` members are drawn at `full`,
/// the rest at `reduced`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpacityRule {
    pub full_rank: usize,
    pub full: f64,
    pub reduced: f64,
}

impl OpacityRule {
    #[inline]
    #[must_use]
    pub fn for_rank(&self, rank: usize) -> f64 {
        if rank < self.full_rank {
            self.full
        } else {
            self.reduced
        }
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        for value in [self.full, self.reduced] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigurationError::InvalidOpacity { value });
            }
        }
        Ok(())
    }
}

impl Default for OpacityRule {
    fn default() -> Self {
        Self {
            full_rank: 20,
            full: 1.0,
            reduced: 0.6,
        }
    }
}

/// Everything [`Chart::new`] needs besides the data.
#[derive(Debug, Clone)]
pub struct ChartSettings {
    pub area: PlotArea,
    pub palette: Vec<Rgb>,
    pub transition: TransitionConfig,
    pub opacity: OpacityRule,
    /// Group shown by the initial render.
    pub default_selection: String,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            area: PlotArea::default(),
            palette: DEFAULT_PALETTE.to_vec(),
            transition: TransitionConfig::default(),
            opacity: OpacityRule::default(),
            default_selection: "Abrera".to_string(),
        }
    }
}

/// The currently selected group key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    key: String,
    version: u64,
}

impl SelectionState {
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of selection calls so far, the initial render included.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Target attributes of `record` at position `rank` of the selection.
#[must_use]
pub fn point_attrs(
    record: &Record,
    rank: usize,
    scales: &Scales,
    colors: &OrdinalColors,
    opacity: &OpacityRule,
) -> VisualAttrs {
    let (cx, cy) = scales.project(record);
    VisualAttrs {
        cx,
        cy,
        fill: colors.color(&record.ownership),
        opacity: opacity.for_rank(rank),
    }
}

/// A scatter plot bound to one dataset.
#[derive(Debug)]
pub struct Chart {
    dataset: Dataset,
    groups: Groups,
    scales: Scales,
    colors: OrdinalColors,
    opacity: OpacityRule,
    area: PlotArea,
    reconciler: Reconciler,
    scene: Scene<RecordId>,
    scheduler: Scheduler<StageTimer<RecordId>>,
    selection: SelectionState,
}

impl Chart {
    /// Build the chart and render `settings.default_selection`.
    ///
    /// An unknown default key renders an empty plot.
    pub fn new(dataset: Dataset, settings: ChartSettings) -> vacplot_core::Result<Self> {
        settings.opacity.validate()?;
        let scales = Scales::build(&dataset, &settings.area)?;
        let colors = OrdinalColors::for_ownership(&dataset, settings.palette)?;
        let groups = Groups::from_dataset(&dataset);
        debug!(
            target: "vacplot.chart",
            records = dataset.len(),
            groups = groups.len(),
            x_domain = ?scales.x.domain(),
            y_domain = ?scales.y.domain(),
            "chart built"
        );

        let mut chart = Self {
            dataset,
            groups,
            scales,
            colors,
            opacity: settings.opacity,
            area: settings.area,
            reconciler: Reconciler::new(settings.transition),
            scene: Scene::new(),
            scheduler: Scheduler::new(),
            selection: SelectionState {
                key: settings.default_selection.clone(),
                version: 0,
            },
        };
        chart.on_selection_changed(&settings.default_selection);
        Ok(chart)
    }

    /// Show the group for `key`, animating from whatever is on screen now.
    ///
    /// Re-selecting the current key is allowed; every point then persists.
    pub fn on_selection_changed(&mut self, key: &str) -> KeyedDiff<RecordId> {
        let group = self.groups.lookup(key);
        if group.is_empty() {
            debug!(target: "vacplot.chart", key, "no group for selection; plot will be empty");
        }

        let dataset = &self.dataset;
        let scales = &self.scales;
        let colors = &self.colors;
        let opacity = &self.opacity;
        let diff = self.reconciler.reconcile(
            &mut self.scene,
            &mut self.scheduler,
            group.members(),
            |id, rank| point_attrs(&dataset[id], rank, scales, colors, opacity),
        );

        self.selection.key.clear();
        self.selection.key.push_str(key);
        self.selection.version += 1;
        info!(
            target: "vacplot.chart",
            key,
            version = self.selection.version,
            at_ms = self.scheduler.now().as_millis() as u64,
            entering = diff.entering.len(),
            persisting = diff.persisting.len(),
            exiting = diff.exiting.len(),
            "selection changed"
        );
        diff
    }

    /// Move the clock forward by `dt`, firing due stage timers in order.
    pub fn advance(&mut self, dt: Duration) {
        let target = self.scheduler.now().saturating_add(dt);
        while let Some(due) = self.scheduler.next_due().filter(|due| *due <= target) {
            self.scene.tick(due.saturating_sub(self.scheduler.now()));
            self.scheduler.advance_to(due);
            while let Some((_, timer)) = self.scheduler.pop_due() {
                self.reconciler
                    .on_timer(&mut self.scene, &mut self.scheduler, timer);
            }
        }
        self.scene.tick(target.saturating_sub(self.scheduler.now()));
        self.scheduler.advance_to(target);
    }

    /// Advance until no stage timer is pending.
    pub fn settle(&mut self) {
        while let Some(due) = self.scheduler.next_due() {
            self.advance(due.saturating_sub(self.scheduler.now()));
        }
    }

    /// Whether no stage timer is pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.scheduler.is_empty()
    }

    /// Virtual time since the chart was built.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Selectable keys, in group order.
    pub fn options(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.keys()
    }

    /// Ownership values with their colors, for an external legend.
    #[must_use]
    pub fn legend(&self) -> Vec<LegendEntry> {
        self.colors.legend()
    }

    #[must_use]
    pub fn scene(&self) -> &Scene<RecordId> {
        &self.scene
    }

    #[must_use]
    pub fn scales(&self) -> &Scales {
        &self.scales
    }

    #[must_use]
    pub fn area(&self) -> &PlotArea {
        &self.area
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[must_use]
    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    #[must_use]
    pub fn transition(&self) -> &TransitionConfig {
        self.reconciler.config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Phase;
    use vacplot_core::{CoreError, Record};

    fn record(municipality: &str, vacancies: f64, applications: f64, ownership: &str) -> Record {
        Record {
            code: format!("{municipality}{vacancies}"),
            name: "Escola".to_string(),
            municipality: municipality.to_string(),
            ownership: ownership.to_string(),
            applications,
            vacancies,
        }
    }

    fn settings(default_selection: &str) -> ChartSettings {
        ChartSettings {
            default_selection: default_selection.to_string(),
            ..ChartSettings::default()
        }
    }

    #[test]
    fn unknown_default_renders_empty_plot() {
        let ds = Dataset::new(vec![record("A", 1.0, 2.0, "pub")]).unwrap();
        let mut chart = Chart::new(ds, settings("Nowhere")).unwrap();
        chart.settle();
        assert!(chart.scene().is_empty());
        assert_eq!(chart.selection().key(), "Nowhere");
        assert_eq!(chart.selection().version(), 1);
    }

    #[test]
    fn opacity_rule_by_rank() {
        let rule = OpacityRule::default();
        assert_eq!(rule.for_rank(0), 1.0);
        assert_eq!(rule.for_rank(19), 1.0);
        assert_eq!(rule.for_rank(20), 0.6);
        assert_eq!(rule.for_rank(500), 0.6);
    }

    #[test]
    fn invalid_opacity_is_a_configuration_error() {
        let ds = Dataset::new(vec![record("A", 1.0, 2.0, "pub")]).unwrap();
        let mut s = settings("A");
        s.opacity.reduced = 1.5;
        assert!(matches!(
            Chart::new(ds, s).unwrap_err(),
            CoreError::Configuration(ConfigurationError::InvalidOpacity { .. })
        ));
    }

    #[test]
    fn reselecting_same_key_is_all_persisting() {
        let ds = Dataset::new(vec![record("A", 1.0, 2.0, "pub"), record("A", 3.0, 4.0, "priv")])
            .unwrap();
        let mut chart = Chart::new(ds, settings("A")).unwrap();
        chart.settle();
        let diff = chart.on_selection_changed("A");
        assert!(diff.is_stable());
        assert_eq!(diff.persisting.len(), 2);
        assert_eq!(chart.scene().count(Phase::Updating), 2);
    }

    #[test]
    fn legend_and_options_follow_first_occurrence() {
        let ds = Dataset::new(vec![
            record("B", 1.0, 2.0, "Private"),
            record("A", 3.0, 4.0, "Public"),
        ])
        .unwrap();
        let chart = Chart::new(ds, settings("A")).unwrap();
        assert_eq!(chart.options().collect::<Vec<_>>(), vec!["B", "A"]);
        let legend = chart.legend();
        assert_eq!(legend[0].label, "Private");
        assert_eq!(legend[0].color, DEFAULT_PALETTE[0]);
    }
}
