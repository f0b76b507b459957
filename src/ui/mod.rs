pub mod dropdown;

pub use dropdown::{escape_html, Dropdown, DropdownOption};
