pub mod add;
pub mod delete;
pub mod due;
pub mod edit;
pub mod list;
pub mod next;
pub mod show;
pub mod tick;
pub mod track;
