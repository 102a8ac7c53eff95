//! `strapsync menu`: interactive loop over instance management and transfers.

use strum::IntoEnumIterator;

use strapsync_core::Chooser;
use strapsync_core::prompt::choose_item;

use crate::cli::{AddInstanceArgs, EndpointArgs, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output::should_color;
use crate::prompt::TerminalChooser;

use super::transfer::Mode;
use super::{instances, transfer};

const TOP: [&str; 3] = ["Manage saved instances", "Transfer data", "Exit"];
const MANAGE: [&str; 4] = ["List instances", "Add instance", "Remove instance", "Back"];

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let mut chooser = TerminalChooser::new(should_color(&global.color));
    loop {
        let picked = *choose_item(&mut chooser, "What do you want to do?", &TOP, |_, s| {
            (*s).to_string()
        })?;
        let outcome = match picked {
            "Manage saved instances" => manage(&mut chooser, global),
            "Transfer data" => transfer_menu(&mut chooser, global).await,
            _ => return Ok(()),
        };
        // Failed actions return to the menu.
        if let Err(e) = outcome {
            eprintln!("{:?}", miette::Report::new(e));
        }
    }
}

fn manage(chooser: &mut dyn Chooser, global: &GlobalOpts) -> Result<(), CliError> {
    loop {
        let picked = *choose_item(chooser, "Saved instances", &MANAGE, |_, s| {
            (*s).to_string()
        })?;
        match picked {
            "List instances" => instances::list(global)?,
            "Add instance" => instances::add(AddInstanceArgs::default(), global)?,
            "Remove instance" => {
                let saved = config::registry(global).list()?;
                if saved.is_empty() {
                    eprintln!("No saved instances.");
                    continue;
                }
                let target = choose_item(chooser, "Remove which instance?", &saved, |_, i| {
                    i.name.clone()
                })?;
                instances::remove(&target.name, global)?;
            }
            _ => return Ok(()),
        }
    }
}

async fn transfer_menu(chooser: &mut dyn Chooser, global: &GlobalOpts) -> Result<(), CliError> {
    let modes: Vec<Mode> = Mode::iter().collect();
    let mode = *choose_item(chooser, "Transfer mode", &modes, |_, m| m.to_string())?;
    transfer::run(mode, &EndpointArgs::default(), global).await
}
