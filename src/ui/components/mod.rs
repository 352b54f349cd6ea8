mod command_input;
mod facet_picker;
mod input;
mod key_result;
mod search_input;
mod sort_picker;

pub use command_input::{CommandEvent, CommandInput};
pub use facet_picker::{FacetPicker, FacetPickerEvent};
pub use key_result::KeyResult;
pub use search_input::{SearchEvent, SearchInput};
pub use sort_picker::{SortPicker, SortPickerEvent};
