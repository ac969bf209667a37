use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::commands::Command;
use crate::di::ServiceContainer;
use crate::presenter::{SwapPresenter, SwapPresenterImpl};
use crate::view::TerminalSwapView;

// Base router trait
#[async_trait]
pub trait Router: Send + Sync {
    async fn run(&self) -> Result<()>;
}

// Command router over stdin
pub struct TerminalRouter {
    services: Arc<ServiceContainer>,
}

impl TerminalRouter {
    pub fn new(services: Arc<ServiceContainer>) -> Self {
        Self { services }
    }
}

/// Feed `reader` line by line to `presenter` until EOF or `quit`.
pub async fn dispatch_lines<R, P>(reader: R, presenter: &P) -> Result<()>
where
    R: AsyncBufRead + Unpin + Send,
    P: SwapPresenter + ?Sized,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Ok(Some(command)) => {
                debug!("Handling command {:?}", command);
                if !presenter.handle(command).await? {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => presenter.display_error(e.to_string()).await?,
        }
    }

    Ok(())
}

#[async_trait]
impl Router for TerminalRouter {
    async fn run(&self) -> Result<()> {
        let presenter = SwapPresenterImpl::new(
            self.services.swap_interactor(),
            Arc::new(TerminalSwapView::new(std::io::stdout())),
            self.services.wallet(),
        );

        presenter.handle(Command::Help).await?;
        dispatch_lines(BufReader::new(tokio::io::stdin()), &presenter).await?;

        info!("Input closed, exiting");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPresenter {
        commands: Mutex<Vec<Command>>,
        errors: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SwapPresenter for RecordingPresenter {
        async fn handle(&self, command: Command) -> Result<bool> {
            let keep_going = command != Command::Quit;
            self.commands.lock().unwrap().push(command);
            Ok(keep_going)
        }

        async fn display_error(&self, message: String) -> Result<()> {
            self.errors.lock().unwrap().push(message);
            Ok(())
        }
    }

    #[tokio::test]
    async fn stops_at_quit_and_reports_parse_errors() {
        let presenter = RecordingPresenter::default();
        let input: &[u8] = b"from SOL\n\nbogus\nquote\nquit\nswap\n";

        dispatch_lines(input, &presenter).await.unwrap();

        assert_eq!(
            *presenter.commands.lock().unwrap(),
            vec![Command::From("SOL".to_string()), Command::Quote, Command::Quit]
        );
        let errors = presenter.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("bogus"));
    }
}
