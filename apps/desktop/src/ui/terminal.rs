//! Interactive terminal session. This thread owns the form; HTTP calls run on
//! the backend worker and come back through `ui_rx`.

use std::{
    io::{self, BufRead},
    thread,
};

use anyhow::{Context, Result};
use client_core::{PredictionForm, SubmitOutcome};
use crossbeam_channel::{bounded, never, select, Receiver, Sender};
use shared::domain::District;

use crate::{
    backend_bridge::{commands::BackendCommand, runtime},
    config::Settings,
    controller::{
        events::UiEvent,
        orchestration::{dispatch_backend_command, submit_prediction},
        reducer::apply_ui_event,
    },
    ui::render,
};

const COMMAND_QUEUE: usize = 16;
const EVENT_QUEUE: usize = 64;

const HELP: &str = "\
Commands:
  lat <value>          set latitude
  lon <value>          set longitude
  bedrooms <n>         set bedroom count (1-10)
  district <name|no.>  choose a district by name or list number
  clear <field>        empty lat, lon, bedrooms or district
  show                 print current values and status
  submit               request a price estimate
  districts [remote]   list selectable districts, or ask the backend
  help                 print this help
  quit                 leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetLatitude(Option<f64>),
    SetLongitude(Option<f64>),
    SetBedrooms(Option<u32>),
    SetDistrict(Option<District>),
    Show,
    Submit,
    Districts { remote: bool },
    Help,
    Quit,
    Invalid(String),
}

/// `None` for blank input.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

    let command = match verb.to_ascii_lowercase().as_str() {
        "lat" | "latitude" => Command::SetLatitude(parse_number(rest)),
        "lon" | "lng" | "longitude" => Command::SetLongitude(parse_number(rest)),
        "bedrooms" | "beds" => Command::SetBedrooms(rest.parse::<u32>().ok()),
        "district" => match parse_district(rest) {
            Some(district) => Command::SetDistrict(Some(district)),
            None => Command::Invalid(format!(
                "unknown district '{rest}'; run `districts` to see the choices"
            )),
        },
        "clear" => match rest.to_ascii_lowercase().as_str() {
            "lat" | "latitude" => Command::SetLatitude(None),
            "lon" | "lng" | "longitude" => Command::SetLongitude(None),
            "bedrooms" | "beds" => Command::SetBedrooms(None),
            "district" => Command::SetDistrict(None),
            other => Command::Invalid(format!("cannot clear '{other}'")),
        },
        "show" => Command::Show,
        "submit" | "predict" => Command::Submit,
        "districts" => Command::Districts {
            remote: rest.eq_ignore_ascii_case("remote"),
        },
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Invalid(format!("unknown command '{other}'; type `help`")),
    };
    Some(command)
}

/// Unparsable text behaves like an emptied numeric input.
fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_district(raw: &str) -> Option<District> {
    if let Ok(position) = raw.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|idx| District::ALL.get(idx))
            .copied();
    }
    raw.parse::<District>().ok()
}

enum Input {
    Line(Option<String>),
    Backend(Option<UiEvent>),
}

pub fn run(settings: Settings) -> Result<()> {
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(COMMAND_QUEUE);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(EVENT_QUEUE);
    let worker = runtime::launch(cmd_rx, ui_tx, settings);
    let lines = spawn_stdin_reader()?;
    let mut stdin_open = true;

    let mut form = PredictionForm::default();
    let mut notifications = form.subscribe();

    println!("🏠 Dự Đoán Giá Bất Động Sản");
    println!("{HELP}\n");
    println!("{}", render::describe_fields(form.fields()));

    // After stdin closes, keep going only until an in-flight estimate lands.
    while stdin_open || form.state().is_loading() {
        let active_lines = if stdin_open { lines.clone() } else { never() };
        let input = select! {
            recv(active_lines) -> line => Input::Line(line.ok()),
            recv(ui_rx) -> event => Input::Backend(event.ok()),
        };

        match input {
            Input::Line(Some(line)) => match parse_command(&line) {
                Some(Command::Quit) => break,
                Some(command) => handle_command(command, &mut form, &cmd_tx),
                None => {}
            },
            Input::Line(None) => stdin_open = false,
            Input::Backend(Some(event)) => {
                if let Some(text) = apply_ui_event(&mut form, event) {
                    println!("{text}");
                }
            }
            Input::Backend(None) => {
                tracing::error!("backend worker stopped unexpectedly");
                break;
            }
        }

        for text in render::drain_notifications(&mut notifications) {
            println!("{text}");
        }
    }

    drop(cmd_tx);
    if waits_for_worker(&form) {
        if worker.join().is_err() {
            tracing::error!("backend worker panicked");
        }
    } else {
        // The worker thread is detached and dies with the process.
        tracing::warn!("quitting with a prediction in flight; not waiting for the backend");
    }
    Ok(())
}

/// Joining mid-request would block on an HTTP call that may never return.
fn waits_for_worker(form: &PredictionForm) -> bool {
    !form.state().is_loading()
}

fn handle_command(
    command: Command,
    form: &mut PredictionForm,
    cmd_tx: &Sender<BackendCommand>,
) {
    match command {
        Command::SetLatitude(value) => form.set_latitude(value),
        Command::SetLongitude(value) => form.set_longitude(value),
        Command::SetBedrooms(value) => form.set_bedrooms(value),
        Command::SetDistrict(value) => form.set_district(value),
        Command::Show => {
            println!("{}", render::describe_fields(form.fields()));
            if let Some(status) = render::describe_state(form.state()) {
                println!("{status}");
            }
        }
        Command::Submit => {
            if submit_prediction(form, cmd_tx) == SubmitOutcome::AlreadyLoading {
                println!("A prediction is already in progress; please wait.");
            }
        }
        Command::Districts { remote: false } => println!("{}", render::describe_local_districts()),
        Command::Districts { remote: true } => {
            if let Err(reason) = dispatch_backend_command(cmd_tx, BackendCommand::FetchDistricts) {
                println!("⚠️ {reason}");
            }
        }
        Command::Help => println!("{HELP}"),
        Command::Invalid(message) => println!("{message}"),
        Command::Quit => {}
    }
}

fn spawn_stdin_reader() -> Result<Receiver<String>> {
    let (line_tx, line_rx) = bounded::<String>(COMMAND_QUEUE);
    thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        })
        .context("failed to spawn stdin reader")?;
    Ok(line_rx)
}
