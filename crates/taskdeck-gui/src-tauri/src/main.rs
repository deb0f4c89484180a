mod commands;
mod state;

use std::path::Path;

use anyhow::Context;
use taskdeck_core::config::Config;
use tracing::{
  error,
  info,
  warn
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{
  EnvFilter,
  fmt
};

const LOG_FILE_PREFIX: &str =
  "taskdeck.log";

fn init_tracing(
  log_dir: Option<&Path>
) -> Option<WorkerGuard> {
  let filter =
    EnvFilter::try_from_default_env()
      .or_else(|_| {
        EnvFilter::try_new(
          "info,taskdeck_gui_tauri=debug,\
           taskdeck_core=debug"
        )
      })
      .unwrap_or_else(|_| {
        EnvFilter::new("info")
      });

  let (file_layer, guard) =
    match log_dir {
      | Some(dir) => {
        let appender =
          tracing_appender::rolling::daily(
            dir,
            LOG_FILE_PREFIX
          );
        let (writer, guard) =
          tracing_appender::non_blocking(
            appender
          );
        (
          Some(
            fmt::layer()
              .with_ansi(false)
              .with_target(true)
              .with_writer(writer)
          ),
          Some(guard)
        )
      }
      | None => (None, None)
    };

  let _ =
    tracing_subscriber::registry()
      .with(filter)
      .with(
        fmt::layer()
          .with_target(true)
          .with_line_number(true)
      )
      .with(file_layer)
      .try_init();

  guard
}

fn main() {
  let config = match Config::load(None)
  {
    | Ok(config) => config,
    | Err(err) => {
      eprintln!(
        "failed to load config: {err:#}"
      );
      std::process::exit(1);
    }
  };

  let _log_guard = init_tracing(
    config.log.directory.as_deref()
  );

  info!(
    config = ?config.loaded_from,
    "starting Taskdeck GUI backend"
  );

  let state =
    match state::AppState::new(&config)
      .context(
        "failed to initialize app \
         state"
      ) {
      | Ok(state) => state,
      | Err(err) => {
        error!(error = %err, "initialization failed");
        std::process::exit(1);
      }
    };

  let result = tauri::Builder::default()
    .setup(|app| {
      install_signal_handlers(
        app.handle().clone()
      );
      Ok(())
    })
    .manage(state)
    .invoke_handler(
      tauri::generate_handler![
        commands::session_user,
        commands::tasks_list,
        commands::task_get,
        commands::task_add,
        commands::task_update,
        commands::task_duplicate,
        commands::task_trash,
        commands::subtask_add,
        commands::ui_log,
      ]
    )
    .run(tauri::generate_context!());

  if let Err(err) = result {
    error!(error = %err, "error while running Taskdeck GUI backend");
    std::process::exit(1);
  }
}

fn install_signal_handlers(
  app_handle: tauri::AppHandle
) {
  tauri::async_runtime::spawn(
    async move {
      wait_for_shutdown_signal().await;
      warn!(
        "received shutdown signal; \
         exiting application"
      );
      app_handle.exit(0);
    }
  );
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
  use tokio::signal::unix::{
    SignalKind,
    signal
  };

  let mut sigint = match signal(
    SignalKind::interrupt()
  ) {
    | Ok(stream) => stream,
    | Err(error) => {
      error!(
        %error,
        "failed to register SIGINT \
         handler; falling back to \
         ctrl_c"
      );
      let _ =
        tokio::signal::ctrl_c().await;
      return;
    }
  };

  let mut sigterm = match signal(
    SignalKind::terminate()
  ) {
    | Ok(stream) => stream,
    | Err(error) => {
      error!(
        %error,
        "failed to register SIGTERM \
         handler; falling back to \
         ctrl_c"
      );
      let _ =
        tokio::signal::ctrl_c().await;
      return;
    }
  };

  tokio::select! {
    _ = sigint.recv() => {}
    _ = sigterm.recv() => {}
  }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
  if let Err(error) =
    tokio::signal::ctrl_c().await
  {
    error!(
      %error,
      "failed waiting for ctrl_c \
       signal"
    );
  }
}
