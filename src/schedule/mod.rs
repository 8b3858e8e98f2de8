//! Integration surface for the external duty scheduler

pub mod facade;

pub use facade::{Assignee, ModificationKind, ModificationRequest, ReassignmentSuggestion, ScheduleFacade};
