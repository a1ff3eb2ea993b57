use crate::demo;
use chrono::NaiveDate;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use serde::Serialize;
use std::collections::BTreeSet;
use tododactyl::{TodoItem, TodoRepository, models::UpdateTodo};

pub fn cli() -> Command {
    Command::new("tododactyl")
        .about("Manage todo items stored in MongoDB")
        .arg(
            Arg::new("database")
                .long("database")
                .global(true)
                .help("Database name (overrides DATABASE_NAME)")
                .value_name("NAME"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(Command::new("demo").about("Run the insert/list/find/update/remove walkthrough"))
        .subcommand(Command::new("list").about("List all todo items"))
        .subcommand(
            Command::new("get")
                .about("Show a single todo item")
                .arg(id_arg()),
        )
        .subcommand(
            Command::new("add")
                .about("Insert a new todo item")
                .arg(description_arg().required(true))
                .arg(tag_arg())
                .arg(deadline_arg().required(true)),
        )
        .subcommand(
            Command::new("update")
                .about("Change fields of an existing todo item")
                .arg(id_arg())
                .arg(description_arg())
                .arg(tag_arg())
                .arg(deadline_arg()),
        )
        .subcommand(
            Command::new("remove")
                .about("Delete a todo item")
                .arg(id_arg()),
        )
}

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(value_parser!(i64))
        .value_name("ID")
}

fn description_arg() -> Arg {
    Arg::new("description")
        .long("description")
        .short('d')
        .value_name("TEXT")
}

fn tag_arg() -> Arg {
    Arg::new("tag")
        .long("tag")
        .short('t')
        .action(ArgAction::Append)
        .help("Tag to attach, may be repeated")
        .value_name("TAG")
}

fn deadline_arg() -> Arg {
    Arg::new("deadline")
        .long("deadline")
        .value_parser(parse_deadline)
        .help("Deadline as YYYY-MM-DD")
        .value_name("DATE")
}

fn parse_deadline(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("invalid deadline '{value}': {e}"))
}

fn tags(matches: &ArgMatches) -> Option<BTreeSet<String>> {
    matches
        .get_many::<String>("tag")
        .map(|values| values.cloned().collect())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn handle_cli(
    matches: &ArgMatches,
    repo: &TodoRepository,
) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("demo", _)) => demo::run(repo).await?,
        Some(("list", _)) => print_json(&repo.list_all().await?)?,
        Some(("get", sub_matches)) => {
            let id = *sub_matches.get_one::<i64>("id").ok_or("missing id")?;
            match repo.find_by_id(id).await? {
                Some(item) => print_json(&item)?,
                None => return Err(format!("Todo item {id} not found").into()),
            }
        }
        Some(("add", sub_matches)) => {
            let description = sub_matches
                .get_one::<String>("description")
                .ok_or("missing description")?;
            let deadline = *sub_matches
                .get_one::<NaiveDate>("deadline")
                .ok_or("missing deadline")?;
            let item = TodoItem::new(
                description.clone(),
                tags(sub_matches).unwrap_or_default(),
                deadline,
            );

            print_json(&repo.insert(item).await?)?;
        }
        Some(("update", sub_matches)) => {
            let id = *sub_matches.get_one::<i64>("id").ok_or("missing id")?;
            let patch = UpdateTodo {
                description: sub_matches.get_one::<String>("description").cloned(),
                tags: tags(sub_matches),
                deadline: sub_matches.get_one::<NaiveDate>("deadline").copied(),
            };
            if patch.is_empty() {
                return Err("nothing to update, pass --description, --tag or --deadline".into());
            }

            let mut item = repo
                .find_by_id(id)
                .await?
                .ok_or_else(|| format!("Todo item {id} not found"))?;
            patch.apply_to(&mut item);
            repo.update(&item).await?;

            print_json(&item)?;
        }
        Some(("remove", sub_matches)) => {
            let id = *sub_matches.get_one::<i64>("id").ok_or("missing id")?;
            print_json(&repo.remove_by_id(id).await?)?;
        }
        _ => {
            cli().print_help()?;
        }
    }

    Ok(())
}
