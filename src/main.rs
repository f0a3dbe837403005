//! codepad：从标准输入读取命令，驱动工作台并打印状态

use std::io::{self, BufRead, Write};
use std::time::Duration;

use codepad::app::Workbench;
use codepad::core::parse_key_chord;
use codepad::kernel::Action;

mod logging;

const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);
const LOG_TAIL: usize = 20;

const HELP: &str = "\
commands:
  open <path>      open a file by its path under the project root
  close            close the active tab
  edit <text>      replace the active file's content
  save             save the active file
  search <query>   search all files
  sh <command>     run a command in the terminal
  key <chord>      press a shortcut, e.g. key ctrl+shift+f
  tree             show the explorer
  tabs             show open tabs
  log              show recent log lines
  quit";

fn main() -> io::Result<()> {
    let mut logging = logging::init();
    let log_rx = logging.as_mut().and_then(|guard| guard.take_lines());

    let mut workbench = Workbench::with_defaults(log_rx)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", HELP)?;
    if let Some(guard) = &logging {
        writeln!(stdout, "logs: {}", guard.log_dir().display())?;
    }
    print_tabs(&mut stdout, &workbench)?;

    for line in stdin.lock().lines() {
        let line = line?;
        let (command, arg) = match line.trim().split_once(' ') {
            Some((command, arg)) => (command, arg.trim()),
            None => (line.trim(), ""),
        };

        match command {
            "" => continue,
            "quit" | "exit" => break,
            "help" => writeln!(stdout, "{}", HELP)?,
            "open" => match workbench.state().tree.find_by_path(arg) {
                Some(id) => {
                    workbench.dispatch(Action::SelectFile(id));
                    print_active(&mut stdout, &workbench)?;
                }
                None => writeln!(stdout, "no such file: {}", arg)?,
            },
            "close" => {
                if let Some(id) = workbench.state().active_file() {
                    workbench.dispatch(Action::CloseTab(id));
                }
                print_tabs(&mut stdout, &workbench)?;
            }
            "edit" => match workbench.state().active_file() {
                Some(file) => {
                    let content = arg.replace("\\n", "\n");
                    workbench.dispatch(Action::EditorContentChanged { file, content });
                    print_tabs(&mut stdout, &workbench)?;
                }
                None => writeln!(stdout, "no active file")?,
            },
            "save" => {
                workbench.dispatch(Action::SaveActive);
                print_tabs(&mut stdout, &workbench)?;
            }
            "search" => {
                workbench.dispatch(Action::SearchSetQuery(arg.to_string()));
                print_search(&mut stdout, &workbench)?;
            }
            "sh" => {
                if workbench.state().terminal.tabs.is_empty() {
                    workbench.dispatch(Action::TerminalNew);
                }
                workbench.dispatch(Action::TerminalSetInput(arg.to_string()));
                workbench.dispatch(Action::TerminalSubmit);
                if !workbench.wait_idle(COMMAND_TIMEOUT) {
                    writeln!(stdout, "command timed out")?;
                }
                print_terminal(&mut stdout, &workbench)?;
            }
            "key" => match parse_key_chord(arg) {
                Ok(event) => {
                    let handled = workbench.handle_key(event, false);
                    workbench.tick();
                    for command in workbench.take_editor_commands() {
                        writeln!(stdout, "editor: {:?}", command)?;
                    }
                    if !handled {
                        writeln!(stdout, "no shortcut for {}", arg)?;
                    }
                    print_tabs(&mut stdout, &workbench)?;
                }
                Err(e) => writeln!(stdout, "bad chord: {}", e)?,
            },
            "tree" => print_tree(&mut stdout, &workbench)?,
            "tabs" => print_tabs(&mut stdout, &workbench)?,
            "log" => {
                workbench.tick();
                let lines: Vec<&str> = workbench.logs().collect();
                for line in &lines[lines.len().saturating_sub(LOG_TAIL)..] {
                    writeln!(stdout, "{}", line)?;
                }
            }
            other => writeln!(stdout, "unknown command: {} (try help)", other)?,
        }
        stdout.flush()?;
    }

    tracing::info!("bye");
    Ok(())
}

fn print_tree(out: &mut impl Write, workbench: &Workbench) -> io::Result<()> {
    let state = workbench.state();
    for row in state.tree.flatten_for_view(&state.ui.explorer_filter) {
        let marker = match (row.is_folder, row.is_expanded) {
            (true, true) => "v ",
            (true, false) => "> ",
            (false, _) => "  ",
        };
        let dirty = if row.is_dirty { " *" } else { "" };
        writeln!(
            out,
            "{}{}{}{}",
            "  ".repeat(usize::from(row.depth)),
            marker,
            row.name,
            dirty
        )?;
    }
    Ok(())
}

fn print_tabs(out: &mut impl Write, workbench: &Workbench) -> io::Result<()> {
    let state = workbench.state();
    let active = state.active_file();
    let mut labels = Vec::new();
    for &id in state.tabs.open_files() {
        let Some(node) = state.tree.resolve(id) else {
            continue;
        };
        let mut label = node.name().to_string();
        if node.is_dirty() {
            label.push('*');
        }
        if Some(id) == active {
            label = format!("[{}]", label);
        }
        labels.push(label);
    }
    if labels.is_empty() {
        writeln!(out, "{}", state.i18n.t("editor.noFileSelected"))
    } else {
        writeln!(out, "{}", labels.join(" | "))
    }
}

fn print_active(out: &mut impl Write, workbench: &Workbench) -> io::Result<()> {
    print_tabs(out, workbench)?;
    if let Some(props) = workbench.state().editor_props() {
        writeln!(out, "-- {} --", props.language.display_name())?;
        writeln!(out, "{}", props.content)?;
    }
    Ok(())
}

fn print_search(out: &mut impl Write, workbench: &Workbench) -> io::Result<()> {
    let state = workbench.state();
    let search = &state.search;
    if let Some(error) = &search.last_error {
        return writeln!(out, "{}", state.i18n.t_with("search.failed", &[("error", error)]));
    }
    writeln!(
        out,
        "{}",
        state.i18n.t_with(
            "search.results",
            &[("count", &search.total_matches), ("files", &search.file_count())],
        )
    )?;
    for file in &search.files {
        writeln!(out, "{}", file.result.path)?;
        for m in &file.result.matches {
            writeln!(out, "  {:>4}: {}", m.line, m.line_content.trim())?;
        }
    }
    Ok(())
}

fn print_terminal(out: &mut impl Write, workbench: &Workbench) -> io::Result<()> {
    let Some(tab) = workbench.state().terminal.active_tab() else {
        return Ok(());
    };
    if let Some(entry) = tab.entries.last() {
        if !entry.output.is_empty() {
            writeln!(out, "{}", entry.output)?;
        }
        if let Some(error) = &entry.error {
            writeln!(out, "{}", error)?;
        }
    }
    write!(out, "{}", tab.prompt)?;
    writeln!(out)
}
