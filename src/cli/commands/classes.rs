//! `academia turmas` command - Class management

use async_trait::async_trait;
use clap::Subcommand;
use miette::Result;
use serde_json::{json, Map, Value};

use crate::cli::screens::{
    self, load_actives, record_choices, set_field, AppContext, DeleteArgs, ListArgs,
    ReactivateArgs, Screen, ShowArgs,
};
use crate::cli::table::{CellValue, ColumnDef, TableRow};
use crate::core::identity::EntityId;
use crate::entities::{Class, Room, Subject};
use crate::schema::wizard::FieldChoices;

#[derive(Subcommand, Debug)]
pub enum ClassCommands {
    /// List active classes
    List(ListArgs),

    /// Open a new class
    New(NewArgs),

    /// Show a class's details
    Show(ShowArgs),

    /// Edit a class
    Edit(EditArgs),

    /// Deactivate a class
    Delete(DeleteArgs),

    /// Reactivate inactive classes
    Reactivate(ReactivateArgs),

    /// List inactive classes
    Inactive,
}

#[derive(clap::Args, Debug, Default)]
pub struct ClassFields {
    /// Class code (e.g. MAT-2024A)
    #[arg(long)]
    pub code: Option<String>,

    /// Subject id
    #[arg(long, value_name = "ID")]
    pub subject: Option<u64>,

    /// Room id
    #[arg(long, value_name = "ID")]
    pub room: Option<u64>,

    #[arg(long)]
    pub active: Option<bool>,
}

impl ClassFields {
    /// References are sent as `{ "id": n }` and swapped for the full record
    /// once the form options are loaded
    pub fn form(&self) -> Map<String, Value> {
        let mut form = Map::new();
        set_field(&mut form, "codigoTurma", self.code.clone());
        set_field(&mut form, "disciplina", self.subject.map(|id| json!({ "id": id })));
        set_field(&mut form, "sala", self.room.map(|id| json!({ "id": id })));
        set_field(&mut form, "ativo", self.active);
        form
    }
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub fields: ClassFields,

    /// Prompt for every field
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Class id
    pub id: EntityId,

    #[command(flatten)]
    pub fields: ClassFields,

    /// Prompt for every field
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 8),
    ColumnDef::new("code", "CODE", 14),
    ColumnDef::new("subject", "SUBJECT", 30),
    ColumnDef::new("room", "ROOM", 8),
];

#[async_trait]
impl Screen for Class {
    const COLUMNS: &'static [ColumnDef] = COLUMNS;

    fn row(&self) -> TableRow {
        TableRow::new(self.id)
            .cell("id", self.id.map_or(CellValue::Empty, CellValue::Id))
            .cell("code", CellValue::Text(self.code.clone()))
            .cell("subject", CellValue::Text(self.subject_name().to_string()))
            .cell(
                "room",
                self.room_number()
                    .map_or(CellValue::Empty, |n| CellValue::Number(i64::from(n))),
            )
    }

    fn heading(&self) -> String {
        self.code.clone()
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        let room = match &self.room {
            Some(room) => format!("{} ({})", room.number, room.capacity_display()),
            None => "-".to_string(),
        };
        vec![("Subject", self.subject_name().to_string()), ("Room", room)]
    }

    async fn form_choices(ctx: &AppContext) -> Result<FieldChoices> {
        let subjects = load_actives::<Subject>(ctx).await?;
        if subjects.is_empty() {
            return Err(miette::miette!(
                help = "Register one with: academia disciplinas new",
                "To create a class, subjects must be registered first."
            ));
        }
        let rooms = load_actives::<Room>(ctx).await?;

        let mut choices = FieldChoices::new();
        choices.insert("disciplina".to_string(), record_choices(&subjects)?);
        choices.insert("sala".to_string(), record_choices(&rooms)?);
        Ok(choices)
    }
}

pub async fn run(cmd: ClassCommands, ctx: &AppContext) -> Result<()> {
    match cmd {
        ClassCommands::List(args) => screens::list::<Class>(ctx, &args).await,
        ClassCommands::New(args) => {
            screens::create::<Class>(ctx, args.fields.form(), args.interactive).await
        }
        ClassCommands::Show(args) => screens::show::<Class>(ctx, args.id).await,
        ClassCommands::Edit(args) => {
            screens::edit::<Class>(ctx, args.id, args.fields.form(), args.interactive).await
        }
        ClassCommands::Delete(args) => screens::delete::<Class>(ctx, &args).await,
        ClassCommands::Reactivate(args) => screens::reactivate::<Class>(ctx, &args).await,
        ClassCommands::Inactive => screens::inactive::<Class>(ctx).await,
    }
}
