pub mod export;
pub mod prompts;
pub mod render;

pub use export::{write_report_csv, write_report_json};
pub use prompts::{
    collect_selection, prompt_animal_count, prompt_ingredients, prompt_weight, prompt_yes_no,
};
pub use render::{display_catalog, display_report};
