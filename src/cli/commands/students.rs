//! `academia alunos` command - Student management

use clap::Subcommand;
use miette::Result;
use serde_json::{Map, Value};

use crate::cli::screens::{
    self, set_field, AppContext, DeleteArgs, ListArgs, ReactivateArgs, Screen, ShowArgs,
};
use crate::cli::table::{CellValue, ColumnDef, TableRow};
use crate::core::identity::EntityId;
use crate::entities::Student;

#[derive(Subcommand, Debug)]
pub enum StudentCommands {
    /// List active students
    List(ListArgs),

    /// Register a new student
    New(NewArgs),

    /// Show a student's details
    Show(ShowArgs),

    /// Edit a student
    Edit(EditArgs),

    /// Deactivate a student
    Delete(DeleteArgs),

    /// Reactivate inactive students
    Reactivate(ReactivateArgs),

    /// List inactive students
    Inactive,
}

/// Form fields; anything left out is prompted for or kept
#[derive(clap::Args, Debug, Default)]
pub struct StudentFields {
    /// Full name
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// Registration number
    #[arg(long)]
    pub registration: Option<String>,

    /// Birth date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub birth_date: Option<String>,

    /// Active flag
    #[arg(long)]
    pub active: Option<bool>,
}

impl StudentFields {
    pub fn form(&self) -> Map<String, Value> {
        let mut form = Map::new();
        set_field(&mut form, "nome", self.name.clone());
        set_field(&mut form, "email", self.email.clone());
        set_field(&mut form, "matricula", self.registration.clone());
        set_field(&mut form, "dataNascimento", self.birth_date.clone());
        set_field(&mut form, "ativo", self.active);
        form
    }
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub fields: StudentFields,

    /// Prompt for every field
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Student id
    pub id: EntityId,

    #[command(flatten)]
    pub fields: StudentFields,

    /// Prompt for every field
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 8),
    ColumnDef::new("name", "NAME", 32),
    ColumnDef::new("email", "EMAIL", 30),
    ColumnDef::new("registration", "REGISTRATION", 14),
    ColumnDef::new("birth_date", "BIRTH DATE", 12),
];

impl Screen for Student {
    const COLUMNS: &'static [ColumnDef] = COLUMNS;

    fn row(&self) -> TableRow {
        TableRow::new(self.id)
            .cell("id", self.id.map_or(CellValue::Empty, CellValue::Id))
            .cell("name", CellValue::Text(self.name.clone()))
            .cell("email", CellValue::Text(self.email.clone()))
            .cell("registration", CellValue::Text(self.registration.clone()))
            .cell("birth_date", CellValue::Date(self.birth_date))
    }

    fn heading(&self) -> String {
        self.name.clone()
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Email", self.email.clone()),
            ("Registration", self.registration.clone()),
            ("Birth date", self.birth_date_display()),
        ]
    }
}

pub async fn run(cmd: StudentCommands, ctx: &AppContext) -> Result<()> {
    match cmd {
        StudentCommands::List(args) => screens::list::<Student>(ctx, &args).await,
        StudentCommands::New(args) => {
            screens::create::<Student>(ctx, args.fields.form(), args.interactive).await
        }
        StudentCommands::Show(args) => screens::show::<Student>(ctx, args.id).await,
        StudentCommands::Edit(args) => {
            screens::edit::<Student>(ctx, args.id, args.fields.form(), args.interactive).await
        }
        StudentCommands::Delete(args) => screens::delete::<Student>(ctx, &args).await,
        StudentCommands::Reactivate(args) => screens::reactivate::<Student>(ctx, &args).await,
        StudentCommands::Inactive => screens::inactive::<Student>(ctx).await,
    }
}
