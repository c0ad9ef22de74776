//! Hooks for collaborators that display the dataset as it changes.

use crate::dataset::Dataset;
use crate::schema::DatasetProfile;

/// Receives the dataset and its fresh profile whenever the session changes.
///
/// All methods default to no-ops so implementors only override what they show.
pub trait SessionObserver: Send + Sync {
    /// A file was ingested and profiled.
    fn on_ingested(&self, _dataset: &Dataset, _profile: &DatasetProfile) {}

    /// A cleaning step ran and the profile was recomputed.
    fn on_step_applied(&self, _dataset: &Dataset, _profile: &DatasetProfile) {}

    /// The session went back to the original dataset.
    fn on_reset(&self, _dataset: &Dataset, _profile: &DatasetProfile) {}
}
