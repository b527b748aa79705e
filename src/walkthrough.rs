//! Walkthrough of the Minute Empire API.
//!
//! This module provides the [`Walkthrough`] driving every API call in order
//! and printing what the server answered.
//!
//! # Flow
//!
//! ```text
//! login → current user → villages → commands on each village → map info → rename
//! ```
//!
//! The first failing call stops the walkthrough and its error is returned.

use log::{debug, info};

use crate::{
    api::{RequestError, Requester, Village},
    config::{Account, Walkthrough as WalkthroughConfig},
    report::{
        format_command_result, format_login, format_map_info, format_rename, format_user,
        format_village,
    },
};

/// Runs the API calls one after the other against a [Requester].
///
/// In tests every printed line is also kept in a transcript.
///
/// # Examples
///
/// ```no_run
/// let requester = EmpireRequester::new("http://localhost:8000");
/// let mut walkthrough = Walkthrough::new(requester, config.account, config.walkthrough);
/// walkthrough.run().await?;
/// ```
pub struct Walkthrough<R: Requester> {
    /// Requester to interact with the Minute Empire server
    requester: R,
    /// Credentials used to log in
    account: Account,
    /// Commands to run and optional rename
    settings: WalkthroughConfig,
    /// Lines printed so far
    #[cfg(test)]
    transcript: Vec<String>,
}

impl<R: Requester> Walkthrough<R> {
    /// Create a new [Walkthrough].
    ///
    /// # Arguments
    ///
    /// * `requester` - An implementation of the [Requester] trait to interact with the server.
    /// * `account` - The credentials used to log in.
    /// * `settings` - The commands to execute and the optional rename.
    pub fn new(requester: R, account: Account, settings: WalkthroughConfig) -> Self {
        Walkthrough {
            requester,
            account,
            settings,
            #[cfg(test)]
            transcript: Vec::new(),
        }
    }

    /// Runs the whole walkthrough.
    ///
    /// # Errors
    ///
    /// Returns the [RequestError] of the first failing call. Lines printed
    /// before the failure are kept.
    pub async fn run(&mut self) -> Result<(), RequestError> {
        info!("logging in as {}", self.account.username);
        let login = self
            .requester
            .login(&self.account.username, &self.account.password)
            .await?;
        self.emit(format_login(&login));

        info!("getting user info");
        let user = self.requester.get_current_user().await?;
        self.emit_all(format_user(&user));

        info!("getting villages");
        let villages = self.requester.get_my_villages().await?;
        debug!("found {} villages", villages.len());
        for village in &villages {
            self.emit_all(format_village(village));
            self.run_commands(village).await?;
        }

        info!("getting map information");
        let map_info = self.requester.get_map_info().await?;
        self.emit_all(format_map_info(&map_info));

        self.rename_first_village(&villages).await?;

        info!("walkthrough finished");
        Ok(())
    }

    /// Lines printed so far.
    #[cfg(test)]
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Executes every configured command on a village.
    async fn run_commands(&mut self, village: &Village) -> Result<(), RequestError> {
        info!("executing commands on village {}", village.id);

        for command in self.settings.commands.clone() {
            let result = self
                .requester
                .execute_command(&village.id, &command)
                .await?;
            self.emit(format_command_result(&command, &result));
        }

        Ok(())
    }

    /// Renames the first village when a new name is configured.
    async fn rename_first_village(&mut self, villages: &[Village]) -> Result<(), RequestError> {
        let Some(new_name) = self.settings.rename_to.clone() else {
            return Ok(());
        };

        let Some(village) = villages.first() else {
            info!("no village to rename to {}", new_name);
            return Ok(());
        };

        let result = self
            .requester
            .rename_village(&village.id, &new_name)
            .await?;
        self.emit(format_rename(village, &new_name, &result));

        Ok(())
    }

    fn emit(&mut self, line: String) {
        println!("{}", line);
        #[cfg(test)]
        self.transcript.push(line);
    }

    fn emit_all(&mut self, lines: Vec<String>) {
        lines.into_iter().for_each(|line| self.emit(line));
    }
}
