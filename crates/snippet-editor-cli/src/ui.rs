use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use snippet_editor_engine::editing::RenderNode;
use snippet_editor_engine::{DragItem, ElementKind, ListId, Mark, Path, Range, Snapshot};

use crate::app::{App, Focus};

pub fn draw(f: &mut Frame, app: &mut App) {
    let snapshot = app.session.snapshot();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(f.area());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ])
        .split(rows[1]);

    let toolbar = Paragraph::new(toolbar_line(&snapshot))
        .block(Block::default().borders(Borders::ALL).title("Format"));
    f.render_widget(toolbar, rows[0]);

    let editor = Paragraph::new(editor_lines(&snapshot))
        .block(pane("Editor", app.focus == Focus::Editor))
        .wrap(Wrap { trim: false });
    f.render_widget(editor, columns[0]);

    let focus = app.focus;
    let items = snippet_list(&snapshot.items, "Items", focus == Focus::List(ListId::Items));
    f.render_stateful_widget(items, columns[1], &mut app.items_state);
    let selected = snippet_list(
        &snapshot.selected,
        "Selected",
        focus == Focus::List(ListId::Selected),
    );
    f.render_stateful_widget(selected, columns[2], &mut app.selected_state);

    let help = Paragraph::new(vec![
        Line::from(
            "Ctrl+Q: Quit | Tab: Focus | Ctrl+B/I/U: Marks | F2-F6: Blocks | \
             Lists: ↑/↓ pick, Shift+↑/↓ reorder, m move, Enter insert",
        ),
        Line::from(Span::styled(
            app.status.clone(),
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    f.render_widget(help, rows[2]);
}

fn pane(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

fn snippet_list<'a>(items: &'a [DragItem], title: &'a str, focused: bool) -> List<'a> {
    let rows: Vec<ListItem> = items
        .iter()
        .map(|item| ListItem::new(Line::from(item.content.as_str())))
        .collect();
    let highlight = if focused {
        Style::default().bg(Color::Yellow).fg(Color::Black)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    List::new(rows)
        .block(pane(title, focused))
        .highlight_style(highlight)
}

fn toolbar_line(snapshot: &Snapshot) -> Line<'static> {
    let button = |label: String, active: bool| {
        let style = if active {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        [Span::styled(label, style), Span::raw(" ")]
    };
    let mut spans = Vec::new();
    for (mark, active) in &snapshot.toolbar.marks {
        spans.extend(button(format!(" {} ", mark.name()), *active));
    }
    spans.push(Span::raw("| "));
    for (n, (kind, active)) in snapshot.toolbar.blocks.iter().enumerate() {
        spans.extend(button(format!(" F{} {} ", n + 2, kind.name()), *active));
    }
    Line::from(spans)
}

fn editor_lines(snapshot: &Snapshot) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    block_lines(
        &snapshot.nodes,
        None,
        0,
        snapshot.selection.as_ref(),
        &mut lines,
    );
    lines
}

fn block_lines<'a>(
    nodes: &'a [RenderNode],
    list: Option<&'a ElementKind>,
    depth: usize,
    selection: Option<&Range>,
    lines: &mut Vec<Line<'static>>,
) {
    let mut number = 0;
    for node in nodes {
        let RenderNode::Element { kind, children, .. } = node else {
            continue;
        };
        if children.iter().any(RenderNode::is_block) {
            let (list, depth) = if kind.is_list() {
                (Some(kind), depth + 1)
            } else {
                (list, depth)
            };
            block_lines(children, list, depth, selection, lines);
            continue;
        }
        number += 1;
        let plain = Style::default();
        let (marker, style) = match kind {
            ElementKind::HeadingOne => (
                "# ".to_string(),
                plain.fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            ElementKind::HeadingTwo => ("## ".to_string(), plain.fg(Color::Cyan)),
            ElementKind::BlockQuote => (
                "│ ".to_string(),
                plain.fg(Color::Gray).add_modifier(Modifier::ITALIC),
            ),
            ElementKind::ListItem if list == Some(&ElementKind::NumberedList) => {
                (format!("{number}. "), plain)
            }
            ElementKind::ListItem => ("• ".to_string(), plain),
            _ => (String::new(), plain),
        };
        let indent = "  ".repeat(depth.saturating_sub(1));
        let mut spans = vec![Span::raw(format!("{indent}{marker}"))];
        inline_spans(children, style, selection, &mut spans);
        lines.push(Line::from(spans));
    }
}

fn mark_style(mark: Mark) -> Style {
    match mark {
        Mark::Bold => Style::default().add_modifier(Modifier::BOLD),
        Mark::Italic => Style::default().add_modifier(Modifier::ITALIC),
        Mark::Underline => Style::default().add_modifier(Modifier::UNDERLINED),
        Mark::Code => Style::default().fg(Color::Green),
    }
}

fn inline_spans(
    nodes: &[RenderNode],
    base: Style,
    selection: Option<&Range>,
    spans: &mut Vec<Span<'static>>,
) {
    for node in nodes {
        match node {
            RenderNode::Text { path, text, marks } => {
                let style = marks
                    .iter()
                    .fold(base, |style, mark| style.patch(mark_style(*mark)));
                leaf_spans(path, text, style, selection, spans);
            }
            RenderNode::Element {
                void: true, path, ..
            } => {
                let focused = selection.is_some_and(|range| path.is_ancestor_of(&range.focus.path));
                let style = if focused {
                    base.add_modifier(Modifier::REVERSED)
                } else {
                    base.fg(Color::Magenta)
                };
                spans.push(Span::styled("⧉", style));
            }
            RenderNode::Element { children, .. } => {
                inline_spans(children, base.bg(Color::DarkGray), selection, spans);
            }
        }
    }
}

/// Char range of a leaf covered by `selection`.
fn covered(path: &Path, len: usize, selection: &Range) -> Option<(usize, usize)> {
    let (start, end) = selection.edges();
    if path < &start.path || path > &end.path {
        return None;
    }
    let from = if *path == start.path { start.offset } else { 0 };
    let to = if *path == end.path { end.offset } else { len };
    Some((from.min(len), to.min(len)))
}

fn leaf_spans(
    path: &Path,
    text: &str,
    style: Style,
    selection: Option<&Range>,
    spans: &mut Vec<Span<'static>>,
) {
    let chars: Vec<char> = text.chars().collect();
    let part = |from: usize, to: usize| chars[from..to].iter().collect::<String>();
    let len = chars.len();

    match selection {
        Some(range) if range.is_collapsed() && range.focus.path == *path => {
            let at = range.focus.offset.min(len);
            spans.push(Span::styled(part(0, at), style));
            spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
            spans.push(Span::styled(part(at, len), style));
        }
        Some(range) if !range.is_collapsed() => match covered(path, len, range) {
            Some((from, to)) if from < to => {
                spans.push(Span::styled(part(0, from), style));
                spans.push(Span::styled(
                    part(from, to),
                    style.add_modifier(Modifier::REVERSED),
                ));
                spans.push(Span::styled(part(to, len), style));
            }
            _ => spans.push(Span::styled(text.to_string(), style)),
        },
        _ => spans.push(Span::styled(text.to_string(), style)),
    }
}
