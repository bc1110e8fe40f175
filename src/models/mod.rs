pub mod movie;
pub mod record;
pub mod validation;
pub mod view_state;
pub mod visual_treat;

pub use movie::Movie;
pub use record::{decade_label, ContentRecord, Facet};
pub use validation::{NumberValidator, StringValidator, ValidationError, Validator};
pub use view_state::{
    ActiveFilter, FilterState, ScoreRange, SortKey, ViewDefaults, ViewMode, ViewState, YearRange,
};
pub use visual_treat::VisualTreat;
