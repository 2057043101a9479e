//! `academia disciplinas` command - Subject management

use clap::Subcommand;
use miette::Result;
use serde_json::{Map, Value};

use crate::cli::screens::{
    self, set_field, AppContext, DeleteArgs, ListArgs, ReactivateArgs, Screen, ShowArgs,
};
use crate::cli::table::{CellValue, ColumnDef, TableRow};
use crate::core::identity::EntityId;
use crate::entities::Subject;

#[derive(Subcommand, Debug)]
pub enum SubjectCommands {
    /// List active subjects
    List(ListArgs),

    /// Register a new subject
    New(NewArgs),

    /// Show a subject's details
    Show(ShowArgs),

    /// Edit a subject
    Edit(EditArgs),

    /// Deactivate a subject
    Delete(DeleteArgs),

    /// Reactivate inactive subjects
    Reactivate(ReactivateArgs),

    /// List inactive subjects
    Inactive,
}

#[derive(clap::Args, Debug, Default)]
pub struct SubjectFields {
    #[arg(long)]
    pub name: Option<String>,

    /// Weekly hour load
    #[arg(long, allow_negative_numbers = true)]
    pub hours: Option<i64>,

    #[arg(long)]
    pub active: Option<bool>,
}

impl SubjectFields {
    pub fn form(&self) -> Map<String, Value> {
        let mut form = Map::new();
        set_field(&mut form, "nome", self.name.clone());
        set_field(&mut form, "carga_horaria", self.hours);
        set_field(&mut form, "ativo", self.active);
        form
    }
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub fields: SubjectFields,

    /// Prompt for every field
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Subject id
    pub id: EntityId,

    #[command(flatten)]
    pub fields: SubjectFields,

    /// Prompt for every field
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 8),
    ColumnDef::new("name", "NAME", 40),
    ColumnDef::new("hours", "WEEKLY HOURS", 14),
];

impl Screen for Subject {
    const COLUMNS: &'static [ColumnDef] = COLUMNS;

    fn row(&self) -> TableRow {
        TableRow::new(self.id)
            .cell("id", self.id.map_or(CellValue::Empty, CellValue::Id))
            .cell("name", CellValue::Text(self.name.clone()))
            .cell("hours", CellValue::Text(self.hours_display()))
    }

    fn heading(&self) -> String {
        self.name.clone()
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![("Weekly hours", self.hours_display())]
    }
}

pub async fn run(cmd: SubjectCommands, ctx: &AppContext) -> Result<()> {
    match cmd {
        SubjectCommands::List(args) => screens::list::<Subject>(ctx, &args).await,
        SubjectCommands::New(args) => {
            screens::create::<Subject>(ctx, args.fields.form(), args.interactive).await
        }
        SubjectCommands::Show(args) => screens::show::<Subject>(ctx, args.id).await,
        SubjectCommands::Edit(args) => {
            screens::edit::<Subject>(ctx, args.id, args.fields.form(), args.interactive).await
        }
        SubjectCommands::Delete(args) => screens::delete::<Subject>(ctx, &args).await,
        SubjectCommands::Reactivate(args) => screens::reactivate::<Subject>(ctx, &args).await,
        SubjectCommands::Inactive => screens::inactive::<Subject>(ctx).await,
    }
}
