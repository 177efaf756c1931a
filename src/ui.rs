//! Terminal UI rendering.
//!
//! Pure drawing: reads the view's region models and paints widgets.  The
//! layout is a vertical stack — URL input box, inline feedback line, the
//! feeds/posts split, and a one-line status bar — with the detail overlay
//! drawn on top when a post is open.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::view::{FeedbackTone, Focus, TuiView};

/// Draw the complete UI for one frame.
pub fn draw(view: &mut TuiView, frame: &mut Frame) {
    let [form_area, feedback_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let [feeds_area, posts_area] =
        Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)])
            .areas(main_area);

    draw_form(view, frame, form_area);
    draw_feedback(view, frame, feedback_area);
    draw_feeds(view, frame, feeds_area);
    draw_posts(view, frame, posts_area);
    draw_status_bar(view, frame, status_area);

    if view.modal.is_some() {
        draw_modal(view, frame);
    }
}

/// Render the URL input box.
fn draw_form(view: &TuiView, frame: &mut Frame, area: Rect) {
    let border_color = if view.input_invalid {
        Color::Red
    } else if view.focus == Focus::Input {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let mut style = Style::default();
    if !view.form_enabled {
        style = style.add_modifier(Modifier::DIM);
    }

    let cursor = if view.focus == Focus::Input && view.form_enabled {
        "▏"
    } else {
        ""
    };

    let input = Paragraph::new(format!("{}{cursor}", view.input))
        .style(style)
        .block(
            Block::default()
                .title(" RSS URL ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color)),
        );
    frame.render_widget(input, area);
}

/// Render the inline feedback line.
fn draw_feedback(view: &TuiView, frame: &mut Frame, area: Rect) {
    let Some((text, tone)) = &view.feedback else {
        return;
    };
    let color = match tone {
        FeedbackTone::Success => Color::Green,
        FeedbackTone::Danger => Color::Red,
    };
    let line = Paragraph::new(Line::from(Span::styled(
        format!(" {text}"),
        Style::default().fg(color),
    )));
    frame.render_widget(line, area);
}

/// Render the feed region, newest subscription first.
fn draw_feeds(view: &TuiView, frame: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = view
        .feed_rows
        .iter()
        .map(|feed| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    feed.title.clone(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    feed.description.clone(),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(format!(" {} ", view.label("news_feed.feeds")))
            .borders(Borders::ALL),
    );
    frame.render_widget(list, area);
}

/// Render the scrollable post list with per-row read styling.
fn draw_posts(view: &mut TuiView, frame: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = view
        .post_rows
        .iter()
        .map(|post| {
            let date_str = post
                .published
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "no date".into());

            let title_style = if post.read {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{date_str:<18}"), Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                Span::styled(post.title.clone(), title_style),
            ]))
        })
        .collect();

    let border_color = if view.focus == Focus::Posts {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" {} ", view.label("news_feed.posts")))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut view.list_state);
}

/// Render the bottom status bar.
fn draw_status_bar(view: &TuiView, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(
                " {} {}",
                view.feed_rows.len(),
                view.label("news_feed.feeds").to_lowercase()
            ),
            Style::default().fg(Color::Green),
        ),
        Span::styled(
            format!(
                "  {} {}",
                view.post_rows.len(),
                view.label("news_feed.posts").to_lowercase()
            ),
            Style::default().fg(Color::Green),
        ),
        Span::raw(format!(
            "  q: quit  Tab: focus  ↑/↓: scroll  Enter: {}",
            view.label("news_feed.view")
        )),
    ]));
    frame.render_widget(status, area);
}

/// Render the post detail overlay.
fn draw_modal(view: &TuiView, frame: &mut Frame) {
    let Some(modal) = &view.modal else {
        return;
    };

    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(modal.body.clone()),
        Line::from(""),
        Line::from(Span::styled(
            modal.link.clone(),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Esc: close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let detail = Paragraph::new(text).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(format!(" {} ", modal.title))
            .borders(Borders::ALL),
    );
    frame.render_widget(detail, area);
}

/// A `percent_x` × `percent_y` rectangle centered in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(middle);

    center
}
