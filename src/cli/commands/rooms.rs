//! `academia salas` command - Room management

use clap::Subcommand;
use miette::Result;
use serde_json::{Map, Value};

use crate::cli::screens::{
    self, set_field, AppContext, DeleteArgs, ListArgs, ReactivateArgs, Screen, ShowArgs,
};
use crate::cli::table::{CellValue, ColumnDef, TableRow};
use crate::core::identity::EntityId;
use crate::entities::Room;

#[derive(Subcommand, Debug)]
pub enum RoomCommands {
    /// List active rooms
    List(ListArgs),

    /// Register a new room
    New(NewArgs),

    /// Show a room's details
    Show(ShowArgs),

    /// Edit a room
    Edit(EditArgs),

    /// Deactivate a room
    Delete(DeleteArgs),

    /// Reactivate inactive rooms
    Reactivate(ReactivateArgs),

    /// List inactive rooms
    Inactive,
}

#[derive(clap::Args, Debug, Default)]
pub struct RoomFields {
    /// Room number
    #[arg(long, allow_negative_numbers = true)]
    pub number: Option<i64>,

    /// Seats
    #[arg(long, allow_negative_numbers = true)]
    pub capacity: Option<i64>,

    #[arg(long)]
    pub active: Option<bool>,
}

impl RoomFields {
    pub fn form(&self) -> Map<String, Value> {
        let mut form = Map::new();
        set_field(&mut form, "numero", self.number);
        set_field(&mut form, "capacidade", self.capacity);
        set_field(&mut form, "ativo", self.active);
        form
    }
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub fields: RoomFields,

    /// Prompt for every field
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Room id
    pub id: EntityId,

    #[command(flatten)]
    pub fields: RoomFields,

    /// Prompt for every field
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 8),
    ColumnDef::new("number", "NUMBER", 10),
    ColumnDef::new("capacity", "CAPACITY", 14),
];

impl Screen for Room {
    const COLUMNS: &'static [ColumnDef] = COLUMNS;

    fn row(&self) -> TableRow {
        TableRow::new(self.id)
            .cell("id", self.id.map_or(CellValue::Empty, CellValue::Id))
            .cell("number", CellValue::Number(i64::from(self.number)))
            .cell("capacity", CellValue::Text(self.capacity_display()))
    }

    fn heading(&self) -> String {
        format!("Room {}", self.number)
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Number", self.number.to_string()),
            ("Capacity", self.capacity_display()),
        ]
    }
}

pub async fn run(cmd: RoomCommands, ctx: &AppContext) -> Result<()> {
    match cmd {
        RoomCommands::List(args) => screens::list::<Room>(ctx, &args).await,
        RoomCommands::New(args) => {
            screens::create::<Room>(ctx, args.fields.form(), args.interactive).await
        }
        RoomCommands::Show(args) => screens::show::<Room>(ctx, args.id).await,
        RoomCommands::Edit(args) => {
            screens::edit::<Room>(ctx, args.id, args.fields.form(), args.interactive).await
        }
        RoomCommands::Delete(args) => screens::delete::<Room>(ctx, &args).await,
        RoomCommands::Reactivate(args) => screens::reactivate::<Room>(ctx, &args).await,
        RoomCommands::Inactive => screens::inactive::<Room>(ctx).await,
    }
}
