//! `academia home` command - The managed areas

use console::style;
use miette::Result;

use crate::core::identity::EntityKind;

/// One-line description shown on the home page
pub fn describe(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Subject => "Subjects and their weekly hour load",
        EntityKind::Room => "Classrooms and seat capacity",
        EntityKind::Class => "Subjects offered in a room under a class code",
        EntityKind::Student => "Students with registration and contact data",
        EntityKind::Enrollment => "Students placed in classes",
    }
}

pub fn render() -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", style("Academic Management").bold().underlined()));
    out.push('\n');
    for kind in EntityKind::all() {
        let command = format!("academia {}", kind.resource());
        out.push_str(&format!(
            "  {:<24} {}\n",
            style(command).cyan(),
            describe(*kind)
        ));
    }
    out.push('\n');
    out.push_str(&format!(
        "{}\n",
        style("Each area supports: list, new, show, edit, delete, inactive, reactivate").dim()
    ));
    out
}

pub fn run() -> Result<()> {
    print!("{}", render());
    Ok(())
}
