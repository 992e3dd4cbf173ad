mod bulk_bar;
mod detail_panel;
mod filter_bar;
mod virtual_list;

pub use bulk_bar::BulkBar;
pub use detail_panel::DetailPanel;
pub use filter_bar::FilterBar;
pub use virtual_list::VirtualList;
