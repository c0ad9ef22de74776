//! Steps command - list the cleaning catalog.

use colored::Colorize;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "Cleaning steps:".cyan().bold());

    for (idx, step) in datawash::catalog().iter().enumerate() {
        let mode = if step.automated {
            "automated".green()
        } else {
            "manual".yellow()
        };
        println!(
            "  {}. {} ({}) [{}]",
            idx + 1,
            step.name.white().bold(),
            step.id.to_string().cyan(),
            mode
        );
        println!("     {}", step.description.dimmed());
    }

    Ok(())
}
