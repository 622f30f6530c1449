mod block_groups;
mod features;

pub use block_groups::BlockGroups;
pub use features::Features;

/// Columns the pipeline adds to block groups.
pub mod columns {
    pub const HOME_WAGE_CATEGORY: &str = "LowWage_Category_Home";
    pub const WORK_WAGE_CATEGORY: &str = "LowWage_Category_Work";
    pub const COMBINED_WAGE_CATEGORY: &str = "LowWage_Combined_home_work";
    pub const LOCALE: &str = "LOCALE";
    /// Overlap area of the area-type polygon a locale was taken from.
    pub const MAX_AREA: &str = "max_area";
}
