use std::path::Path;

use anyhow::Result;
use dialoguer::Select;

use jjprep_core::plan::GeneratedPlan;
use jjprep_core::preview::{self, DayCursor};

use crate::render;

pub fn run(plan_path: &Path, start_date: &str, all: bool) -> Result<()> {
    let plan = GeneratedPlan::load(plan_path)?;
    let preview = preview::project(&plan, start_date);

    if preview.is_empty() {
        println!("Plan has no days.");
        return Ok(());
    }

    if all {
        for (i, day) in preview.iter().enumerate() {
            println!("{}", render::render_day(day));
            if i < preview.len() - 1 {
                println!();
            }
        }
        return Ok(());
    }

    let mut cursor = DayCursor::new(preview.len());

    loop {
        println!("{}\n", render::render_day(&preview[cursor.index()]));

        let choices = ["Next day", "Previous day", "Done"];
        let selection = Select::new()
            .with_prompt(format!("Day {} of {}", cursor.index() + 1, preview.len()))
            .items(&choices)
            .default(0)
            .interact()?;

        match selection {
            0 => {
                cursor.next();
            }
            1 => {
                cursor.prev();
            }
            _ => break,
        }
    }

    Ok(())
}
