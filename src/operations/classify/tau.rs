use crate::config::MapperConfig;
use crate::store::PolylineStore;

/// Computes the adaptive topology threshold τ from the digitized traces.
pub struct ComputeTau {
    multiplier: f64,
    fallback_mean_spacing: f64,
}

impl ComputeTau {
    /// Creates a new `ComputeTau` query.
    #[must_use]
    pub fn new(multiplier: f64, fallback_mean_spacing: f64) -> Self {
        Self {
            multiplier,
            fallback_mean_spacing,
        }
    }

    /// Builds the query from configuration.
    #[must_use]
    pub fn from_config(config: &MapperConfig) -> Self {
        Self::new(config.tau_multiplier, config.fallback_mean_spacing)
    }

    /// Mean segment length over every segment of every polyline, or `None`
    /// when there are no segments.
    #[must_use]
    pub fn mean_spacing(store: &PolylineStore) -> Option<f64> {
        let (total, count) = store
            .iter()
            .flat_map(|(_, polyline)| polyline.segments())
            .fold((0.0, 0_usize), |(total, count), (a, b)| {
                (total + (b - a).norm(), count + 1)
            });
        #[allow(clippy::cast_precision_loss)]
        let mean = total / count as f64;
        (count > 0).then_some(mean)
    }

    /// Executes the query, returning τ.
    #[must_use]
    pub fn execute(&self, store: &PolylineStore) -> f64 {
        let mean = Self::mean_spacing(store).unwrap_or_else(|| {
            tracing::warn!(
                "No segments to average, using fallback spacing {}",
                self.fallback_mean_spacing
            );
            self.fallback_mean_spacing
        });
        tracing::debug!("Mean vertex spacing: {:.6}", mean);
        self.multiplier * mean
    }
}
