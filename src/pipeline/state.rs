/// Pipeline state definitions for tracking one harvesting run
///
/// This module defines every stage a run passes through and which stage may
/// follow which.
use std::fmt;

/// Represents the current stage of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    /// Nothing has happened yet
    Start,

    /// The PCF hub URL is known
    HubResolved,

    // ===== Branches =====
    /// The hub URL is itself a PDF
    DirectPdfShortcut,

    /// The hub page lists every report; no tab resolution or crawl
    ListingShortcut,

    /// Tab resolution, section extraction and BFS crawl
    StandardFlow,

    // ===== Convergence =====
    /// On-site results have been merged
    Merged,

    /// The merged count has been compared with the minimum
    ThresholdChecked,

    /// Search fallback results have been merged in
    FallbackMerged,

    /// Documents have been downloaded
    Downloaded,

    /// The result has been assembled
    Done,
}

impl PipelineState {
    /// Returns true if `next` may directly follow this state
    pub fn can_transition_to(&self, next: PipelineState) -> bool {
        use PipelineState::*;

        matches!(
            (self, next),
            (Start, HubResolved)
                | (HubResolved, DirectPdfShortcut)
                | (HubResolved, ListingShortcut)
                | (HubResolved, StandardFlow)
                | (DirectPdfShortcut, Downloaded)
                | (ListingShortcut, Merged)
                | (StandardFlow, Merged)
                | (Merged, ThresholdChecked)
                | (ThresholdChecked, FallbackMerged)
                | (ThresholdChecked, Downloaded)
                | (FallbackMerged, Downloaded)
                | (Downloaded, Done)
        )
    }

    /// Returns true once the run is complete
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true for the three branch states
    pub fn is_branch(&self) -> bool {
        matches!(
            self,
            Self::DirectPdfShortcut | Self::ListingShortcut | Self::StandardFlow
        )
    }

    /// Stable snake_case name, used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::HubResolved => "hub_resolved",
            Self::DirectPdfShortcut => "direct_pdf_shortcut",
            Self::ListingShortcut => "listing_shortcut",
            Self::StandardFlow => "standard_flow",
            Self::Merged => "merged",
            Self::ThresholdChecked => "threshold_checked",
            Self::FallbackMerged => "fallback_merged",
            Self::Downloaded => "downloaded",
            Self::Done => "done",
        }
    }

    /// Returns all pipeline states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Start,
            Self::HubResolved,
            Self::DirectPdfShortcut,
            Self::ListingShortcut,
            Self::StandardFlow,
            Self::Merged,
            Self::ThresholdChecked,
            Self::FallbackMerged,
            Self::Downloaded,
            Self::Done,
        ]
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
