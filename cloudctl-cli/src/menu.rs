//! Interactive numbered menu
//!
//! A finite-state loop over line-oriented input:
//!
//! ```text
//! ShowMenu -> AwaitChoice -> Dispatch -> ShowMenu
//!                  |
//!                  +-> Exit (99, end of input, a non-number, or Ctrl-C)
//! ```
//!
//! An unknown number redisplays the menu. An action that fails prints its error
//! and the loop continues. Ctrl-C while the menu waits for input exits it.

use anyhow::Result;
use colored::*;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use crate::commands::Action;
use crate::config::Config;
use crate::interrupt::Interrupts;

/// An action entry of the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ListInstances,
    ListZones,
    StartInstance,
    ListRegions,
    StopInstance,
    CreateInstance,
    RebootInstance,
    ListImages,
    RunCommand,
    CreateImage,
}

/// What a menu number selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Choice(MenuChoice),
    Quit,
}

impl MenuEntry {
    /// Map a menu number to its entry
    pub fn from_number(number: u32) -> Option<Self> {
        let choice = match number {
            1 => MenuChoice::ListInstances,
            2 => MenuChoice::ListZones,
            3 => MenuChoice::StartInstance,
            4 => MenuChoice::ListRegions,
            5 => MenuChoice::StopInstance,
            6 => MenuChoice::CreateInstance,
            7 => MenuChoice::RebootInstance,
            8 => MenuChoice::ListImages,
            9 => MenuChoice::RunCommand,
            10 => MenuChoice::CreateImage,
            99 => return Some(Self::Quit),
            _ => return None,
        };
        Some(Self::Choice(choice))
    }
}

/// Why the menu loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuExit {
    Quit,
    EndOfInput,
    NotANumber,
    Interrupted,
}

/// Summary of a finished menu session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuOutcome {
    pub exit: MenuExit,
    pub menus_shown: u32,
    pub actions_run: u32,
    pub failures: u32,
}

enum MenuState {
    ShowMenu,
    AwaitChoice,
    Dispatch(MenuChoice),
    Exit(MenuExit),
}

/// A prompt that produced no line
enum Stop {
    Exit(MenuExit),
    Failed(anyhow::Error),
}

impl From<std::io::Error> for Stop {
    fn from(err: std::io::Error) -> Self {
        Stop::Failed(err.into())
    }
}

impl Stop {
    fn into_state(self) -> Result<MenuState> {
        match self {
            Stop::Exit(exit) => Ok(MenuState::Exit(exit)),
            Stop::Failed(err) => Err(err),
        }
    }
}

/// Menu session reading choices and arguments from `R`
pub struct Menu<'a, R> {
    config: &'a Config,
    interrupts: &'a Interrupts,
    lines: Lines<R>,
}

impl<'a, R: AsyncBufRead + Unpin> Menu<'a, R> {
    pub fn new(config: &'a Config, interrupts: &'a Interrupts, input: R) -> Self {
        Self {
            config,
            interrupts,
            lines: input.lines(),
        }
    }

    /// Run the loop until it exits
    pub async fn run(mut self) -> Result<MenuOutcome> {
        let mut outcome = MenuOutcome {
            exit: MenuExit::Quit,
            menus_shown: 0,
            actions_run: 0,
            failures: 0,
        };
        let mut state = MenuState::ShowMenu;

        loop {
            state = match state {
                MenuState::ShowMenu => {
                    print_menu();
                    outcome.menus_shown += 1;
                    MenuState::AwaitChoice
                }
                MenuState::AwaitChoice => match self.prompt("Enter a number: ").await {
                    Err(stop) => stop.into_state()?,
                    Ok(line) if line.is_empty() => MenuState::AwaitChoice,
                    Ok(line) => match line.parse::<u32>() {
                        Err(_) => {
                            println!("Not a menu number.");
                            MenuState::Exit(MenuExit::NotANumber)
                        }
                        Ok(number) => match MenuEntry::from_number(number) {
                            Some(MenuEntry::Quit) => MenuState::Exit(MenuExit::Quit),
                            Some(MenuEntry::Choice(choice)) => MenuState::Dispatch(choice),
                            None => MenuState::ShowMenu,
                        },
                    },
                },
                MenuState::Dispatch(choice) => match self.collect(choice).await {
                    Err(stop) => stop.into_state()?,
                    Ok(action) => {
                        let label = action.failure_label();
                        outcome.actions_run += 1;
                        if let Err(err) = action.perform(self.config, self.interrupts).await {
                            outcome.failures += 1;
                            println!("{}", format!("Error {}: {:#}", label, err).red());
                        }
                        MenuState::ShowMenu
                    }
                },
                MenuState::Exit(exit) => {
                    outcome.exit = exit;
                    return Ok(outcome);
                }
            };
        }
    }

    /// Ask for the arguments of `choice`
    async fn collect(&mut self, choice: MenuChoice) -> Result<Action, Stop> {
        let action = match choice {
            MenuChoice::ListInstances => Action::ListInstances,
            MenuChoice::ListZones => Action::ListZones,
            MenuChoice::ListRegions => Action::ListRegions,
            MenuChoice::ListImages => Action::ListImages,
            MenuChoice::StartInstance => Action::StartInstance {
                instance_id: self.prompt("Instance ID to start: ").await?,
            },
            MenuChoice::StopInstance => Action::StopInstance {
                instance_id: self.prompt("Instance ID to stop: ").await?,
            },
            MenuChoice::RebootInstance => Action::RebootInstance {
                instance_id: self.prompt("Instance ID to reboot: ").await?,
            },
            MenuChoice::CreateInstance => {
                let image_id = self.prompt("Image ID (e.g. ami-12345678): ").await?;
                let name = self.prompt("Name of the new instance: ").await?;
                let key_name = self.prompt("Key pair name (optional): ").await?;
                Action::CreateInstance {
                    image_id,
                    name,
                    key_name: Some(key_name).filter(|k| !k.is_empty()),
                }
            }
            MenuChoice::RunCommand => {
                let instance_id = self.prompt("Instance ID to run the command on: ").await?;
                let command = self.prompt("Command to run: ").await?;
                Action::RunCommand {
                    instance_id,
                    command,
                }
            }
            MenuChoice::CreateImage => {
                let instance_id = self.prompt("Instance ID to capture: ").await?;
                let name = self.prompt("Image name: ").await?;
                let description = self.prompt("Image description (optional): ").await?;
                Action::CreateImage {
                    instance_id,
                    name,
                    description: Some(description).filter(|d| !d.is_empty()),
                }
            }
        };

        Ok(action)
    }

    /// Print `label` and read one trimmed line
    ///
    /// Input that is already available wins over a pending interrupt.
    async fn prompt(&mut self, label: &str) -> Result<String, Stop> {
        print!("{}", label);
        std::io::stdout().flush()?;

        let interrupts = self.interrupts;
        tokio::select! {
            biased;
            line = self.lines.next_line() => match line? {
                Some(line) => Ok(line.trim().to_string()),
                None => Err(Stop::Exit(MenuExit::EndOfInput)),
            },
            _ = interrupts.wait() => {
                println!();
                Err(Stop::Exit(MenuExit::Interrupted))
            }
        }
    }
}

/// Run the menu on standard input
pub async fn run_interactive(config: &Config, interrupts: &Interrupts) -> Result<MenuOutcome> {
    let outcome = Menu::new(config, interrupts, BufReader::new(tokio::io::stdin()))
        .run()
        .await?;
    tracing::debug!("Menu exited: {:?}", outcome);
    Ok(outcome)
}

fn print_menu() {
    let rule = "─".repeat(44);
    println!("{}", rule.dimmed());
    println!("{}", "            cloudctl instance console".bold());
    println!("{}", rule.dimmed());
    println!("1. List instances");
    println!("2. List availability zones");
    println!("3. Start instance");
    println!("4. List regions");
    println!("5. Stop instance");
    println!("6. Create instance");
    println!("7. Reboot instance");
    println!("8. List images");
    println!("9. Run command on instance");
    println!("10. Create image");
    println!("99. Quit");
    println!("{}", rule.dimmed());
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudctl_exec::{AttemptLimit, PollPolicy};
    use cloudctl_sim::store::{Inventory, create_store};
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use std::time::Duration;
    use tokio::io::{AsyncRead, ReadBuf};

    const WEB: &str = "i-0a1b2c3d4e5f60001";

    fn offline_config() -> Config {
        Config {
            endpoint: "http://127.0.0.1:9".to_string(),
            region: "ap-northeast-2".to_string(),
            profile: "default".to_string(),
            poll: PollPolicy::default(),
        }
    }

    async fn sim_config() -> Config {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(cloudctl_sim::serve(listener, create_store(Inventory::seeded())));

        Config {
            endpoint: format!("http://{}", addr),
            region: "ap-northeast-2".to_string(),
            profile: "default".to_string(),
            poll: PollPolicy::new(Duration::from_millis(10), AttemptLimit::Limited(10))
                .with_settle_delay(Duration::from_millis(5)),
        }
    }

    async fn run_script(config: &Config, script: &str) -> MenuOutcome {
        let interrupts = Interrupts::new();
        Menu::new(config, &interrupts, script.as_bytes())
            .run()
            .await
            .unwrap()
    }

    /// Replays a script, then behaves like a user who presses Ctrl-C at the
    /// next prompt instead of typing
    struct CtrlCAfterScript {
        script: &'static [u8],
        interrupts: Interrupts,
        pressed: bool,
    }

    impl AsyncRead for CtrlCAfterScript {
        fn poll_read(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            let n = match AsyncBufRead::poll_fill_buf(self.as_mut(), cx) {
                Poll::Ready(Ok(available)) => {
                    let n = available.len().min(buf.remaining());
                    buf.put_slice(&available[..n]);
                    n
                }
                Poll::Ready(Err(err)) => return Poll::Ready(Err(err)),
                Poll::Pending => return Poll::Pending,
            };
            AsyncBufRead::consume(self, n);
            Poll::Ready(Ok(()))
        }
    }

    impl AsyncBufRead for CtrlCAfterScript {
        fn poll_fill_buf(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<std::io::Result<&[u8]>> {
            let this = self.get_mut();
            if !this.script.is_empty() {
                return Poll::Ready(Ok(this.script));
            }
            if !this.pressed {
                this.pressed = true;
                this.interrupts.trigger();
            }
            Poll::Pending
        }

        fn consume(self: Pin<&mut Self>, amt: usize) {
            let this = self.get_mut();
            this.script = &this.script[amt..];
        }
    }

    #[test]
    fn test_menu_numbers() {
        assert_eq!(
            MenuEntry::from_number(1),
            Some(MenuEntry::Choice(MenuChoice::ListInstances))
        );
        assert_eq!(
            MenuEntry::from_number(10),
            Some(MenuEntry::Choice(MenuChoice::CreateImage))
        );
        assert_eq!(MenuEntry::from_number(99), Some(MenuEntry::Quit));
        assert_eq!(MenuEntry::from_number(0), None);
        assert_eq!(MenuEntry::from_number(11), None);
    }

    #[tokio::test]
    async fn test_quit_exits() {
        let outcome = run_script(&offline_config(), "99\n").await;
        assert_eq!(outcome.exit, MenuExit::Quit);
        assert_eq!(outcome.menus_shown, 1);
        assert_eq!(outcome.actions_run, 0);
    }

    #[tokio::test]
    async fn test_non_number_exits() {
        let outcome = run_script(&offline_config(), "list\n1\n").await;
        assert_eq!(outcome.exit, MenuExit::NotANumber);
        assert_eq!(outcome.actions_run, 0);
    }

    #[tokio::test]
    async fn test_unknown_number_redisplays_menu() {
        let outcome = run_script(&offline_config(), "42\n\n0\n99\n").await;
        assert_eq!(outcome.exit, MenuExit::Quit);
        assert_eq!(outcome.menus_shown, 3);
    }

    #[tokio::test]
    async fn test_end_of_input_exits() {
        let outcome = run_script(&offline_config(), "").await;
        assert_eq!(outcome.exit, MenuExit::EndOfInput);

        let outcome = run_script(&offline_config(), "3\n").await;
        assert_eq!(outcome.exit, MenuExit::EndOfInput);
        assert_eq!(outcome.actions_run, 0);
    }

    #[tokio::test]
    async fn test_ctrl_c_at_prompt_exits() {
        let config = offline_config();
        let interrupts = Interrupts::new();
        let input = CtrlCAfterScript {
            script: b"",
            interrupts: interrupts.clone(),
            pressed: false,
        };

        let outcome = Menu::new(&config, &interrupts, input).run().await.unwrap();
        assert_eq!(outcome.exit, MenuExit::Interrupted);
        assert_eq!(outcome.menus_shown, 1);
    }

    #[tokio::test]
    async fn test_ctrl_c_after_command_exits_idle_menu() {
        let config = sim_config().await;
        let interrupts = Interrupts::new();
        let input = CtrlCAfterScript {
            script: b"9\ni-0a1b2c3d4e5f60001\necho hi\n",
            interrupts: interrupts.clone(),
            pressed: false,
        };

        let outcome = tokio::time::timeout(
            Duration::from_secs(10),
            Menu::new(&config, &interrupts, input).run(),
        )
        .await
        .expect("menu exits on Ctrl-C")
        .unwrap();

        assert_eq!(outcome.exit, MenuExit::Interrupted);
        assert_eq!(outcome.actions_run, 1);
        assert_eq!(outcome.failures, 0);
        assert_eq!(outcome.menus_shown, 2);
    }

    #[tokio::test]
    async fn test_ctrl_c_cancels_running_command_and_menu_continues() {
        let mut config = sim_config().await;
        config.poll = PollPolicy::new(Duration::from_secs(30), AttemptLimit::Limited(10))
            .with_settle_delay(Duration::from_secs(30));
        let interrupts = Interrupts::new();
        interrupts.trigger();

        let script = format!("9\n{}\nsleep 600\n99\n", WEB);
        let outcome = tokio::time::timeout(
            Duration::from_secs(10),
            Menu::new(&config, &interrupts, script.as_bytes()).run(),
        )
        .await
        .expect("interrupt stops the wait")
        .unwrap();

        assert_eq!(outcome.exit, MenuExit::Quit);
        assert_eq!(outcome.actions_run, 1);
        assert_eq!(outcome.failures, 0);
    }

    #[tokio::test]
    async fn test_failed_action_continues_loop() {
        let config = sim_config().await;
        let outcome = run_script(&config, "3\ni-doesnotexist\n1\n99\n").await;
        assert_eq!(outcome.exit, MenuExit::Quit);
        assert_eq!(outcome.actions_run, 2);
        assert_eq!(outcome.failures, 1);
        assert_eq!(outcome.menus_shown, 3);
    }

    #[tokio::test]
    async fn test_session_against_emulator() {
        let config = sim_config().await;
        let script = "6\nami-0c9c942bd7bf113a2\nworker\n\n\
                      9\ni-0a1b2c3d4e5f60001\necho hi\n\
                      10\ni-0a1b2c3d4e5f60001\nbackup\n\n\
                      8\n2\n4\n99\n";
        let outcome = run_script(&config, script).await;
        assert_eq!(outcome.exit, MenuExit::Quit);
        assert_eq!(outcome.actions_run, 6);
        assert_eq!(outcome.failures, 0);
    }
}
