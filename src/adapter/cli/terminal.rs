//! Plain-text render target for the terminal.

use std::io::{self, Write};

use crate::application::render::{CardAction, GroupCard, PanelContent, PanelView, RenderTarget};

/// Holds the latest view of one panel. Each render replaces the previous
/// one, and only the final state is printed.
#[derive(Debug, Default)]
pub struct TerminalTarget {
    current: Option<PanelView>,
}

impl TerminalTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_to(&mut out)
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match &self.current {
            Some(view) => write_panel(out, view),
            None => Ok(()),
        }
    }
}

impl RenderTarget for TerminalTarget {
    fn render(&mut self, view: &PanelView) {
        self.current = Some(view.clone());
    }
}

pub fn write_panel<W: Write>(out: &mut W, view: &PanelView) -> io::Result<()> {
    writeln!(out, "== {} ==", view.context.title())?;
    match &view.content {
        PanelContent::Cards(cards) => {
            for card in cards {
                write_card(out, card)?;
            }
        }
        PanelContent::Empty(message) | PanelContent::Message(message) => {
            writeln!(out, "{}", message)?;
        }
    }
    writeln!(out)
}

fn write_card<W: Write>(out: &mut W, card: &GroupCard) -> io::Result<()> {
    write!(out, "\n{}", card.title)?;
    if let Some(badge) = &card.badge {
        write!(out, "  [{}]", badge)?;
    }
    writeln!(out)?;

    for field in &card.fields {
        writeln!(out, "  {:<10} {}", format!("{}:", field.label), field.value)?;
    }

    if !card.actions.is_empty() {
        let actions: Vec<String> = card.actions.iter().map(action_text).collect();
        writeln!(out, "  {}", actions.join("  "))?;
    }
    Ok(())
}

fn action_text(action: &CardAction) -> String {
    match (&action.href, action.enabled) {
        (_, false) => format!("({})", action.label),
        (Some(href), true) => format!("[{} {}]", action.label, href),
        (None, true) => format!("[{}]", action.label),
    }
}
