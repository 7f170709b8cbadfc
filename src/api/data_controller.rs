use serde::Deserialize;
use tracing::debug;

use crate::carpet::Carpet;
use crate::core::Series;
use crate::error::{ChartError, ChartResult};
use crate::render::RenderTarget;

use super::ChartEngine;

impl<R: RenderTarget> ChartEngine<R> {
    /// Inserts or replaces the series called `name`. Replaced series keep
    /// their position in draw order.
    pub fn set_series(&mut self, name: impl Into<String>, series: Series) -> Option<Series> {
        let name = name.into();
        let len = series.resolve().map_or(0, |resolved| resolved.len);
        debug!(series = %name, len, "set series");
        let previous = self.series.insert(name, series);
        self.invalidate();
        previous
    }

    /// Parses a series from a data-provider JSON object.
    pub fn set_series_json(
        &mut self,
        name: impl Into<String>,
        json: &serde_json::Value,
    ) -> ChartResult<Option<Series>> {
        let name = name.into();
        let series = Series::deserialize(json)
            .map_err(|err| ChartError::InvalidData(format!("series `{name}`: {err}")))?;
        Ok(self.set_series(name, series))
    }

    pub fn remove_series(&mut self, name: &str) -> Option<Series> {
        let removed = self.series.shift_remove(name);
        if removed.is_some() {
            debug!(series = %name, "remove series");
            self.invalidate();
        }
        removed
    }

    #[must_use]
    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.get(name)
    }

    pub fn series_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.series.keys().map(String::as_str)
    }

    pub fn clear_series(&mut self) {
        if self.series.is_empty() {
            return;
        }
        debug!(count = self.series.len(), "clear series");
        self.series.clear();
        self.invalidate();
    }

    /// Registers a carpet trace. Its control points join autorange and its
    /// gridlines are drawn under the series.
    pub fn add_carpet(&mut self, name: impl Into<String>, carpet: Carpet) -> Option<Carpet> {
        let name = name.into();
        debug!(
            carpet = %name,
            na = carpet.grid().na(),
            nb = carpet.grid().nb(),
            "add carpet"
        );
        let previous = self.carpets.insert(name, carpet);
        self.invalidate();
        previous
    }

    pub fn add_carpet_json(
        &mut self,
        name: impl Into<String>,
        json: &serde_json::Value,
    ) -> ChartResult<Option<Carpet>> {
        let name = name.into();
        let carpet = Carpet::deserialize(json)
            .map_err(|err| ChartError::InvalidGrid(format!("carpet `{name}`: {err}")))?;
        Ok(self.add_carpet(name, carpet))
    }

    pub fn remove_carpet(&mut self, name: &str) -> Option<Carpet> {
        let removed = self.carpets.shift_remove(name);
        if removed.is_some() {
            debug!(carpet = %name, "remove carpet");
            self.invalidate();
        }
        removed
    }

    #[must_use]
    pub fn carpet(&self, name: &str) -> Option<&Carpet> {
        self.carpets.get(name)
    }
}
