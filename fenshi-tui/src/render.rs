//! Paints a [`Scene`] onto ratatui canvases.

use fenshi_chart::{
    ColorRole, ColorTokens, CoordinateType, DrawCommand, InfoSummary, Scene, TextAlign,
    TooltipContent,
    format::{format_change, format_number, format_percent, format_price},
};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Wrap,
        canvas::{Canvas, Circle, Context, Line as CanvasLine},
    },
};

use crate::layout::{PX_PER_COL, PaneLayout};

/// Status line contents gathered while the chart lock is held.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub coordinate_type: CoordinateType,
    pub theme: &'static str,
    pub paused: bool,
    pub scroll_position: f64,
    pub len: usize,
    pub capacity: usize,
}

/// Resolve a CSS colour token. `rgba(...)` drops the alpha channel.
pub fn parse_color(token: &str) -> Color {
    let token = token.trim();
    if let Some(body) = token
        .strip_prefix("rgba(")
        .or_else(|| token.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let channels: Vec<u8> = body
            .split(',')
            .take(3)
            .filter_map(|channel| channel.trim().parse().ok())
            .collect();
        if let [r, g, b] = channels[..] {
            return Color::Rgb(r, g, b);
        }
        return Color::Reset;
    }
    token.parse().unwrap_or(Color::Reset)
}

fn color(role: ColorRole, tokens: &ColorTokens) -> Color {
    parse_color(role.resolve(tokens))
}

pub fn render_ui(
    f: &mut Frame,
    layout: &PaneLayout,
    scene: &Scene,
    tokens: &ColorTokens,
    status: &Status,
) {
    let background = color(ColorRole::Background, tokens);

    render_info(f, layout.info, scene.info.as_ref(), tokens);
    render_pane(
        f,
        layout.price,
        &scene.price,
        scene.layout.width,
        scene.layout.height,
        background,
        tokens,
    );
    render_pane(
        f,
        layout.volume,
        &scene.volume,
        scene.layout.width,
        scene.layout.volume_height,
        background,
        tokens,
    );
    render_pane(
        f,
        layout.time_axis,
        &scene.time_axis,
        scene.layout.width,
        scene.layout.time_axis_height,
        background,
        tokens,
    );
    render_tooltip(f, layout.side, scene.tooltip.as_ref(), tokens);
    render_status(f, layout.status, status);
}

fn render_pane(
    f: &mut Frame,
    area: Rect,
    commands: &[DrawCommand],
    width: f64,
    height: f64,
    background: Color,
    tokens: &ColorTokens,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .background_color(background)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for command in commands {
                paint(ctx, command, height, tokens);
            }
        });

    f.render_widget(canvas, area);
}

/// Paint one command. Scene y grows downward, canvas y grows upward.
fn paint(ctx: &mut Context<'_>, command: &DrawCommand, height: f64, tokens: &ColorTokens) {
    let flip = |y: f64| height - y;

    match command {
        DrawCommand::Line {
            from, to, color: role, ..
        } => ctx.draw(&CanvasLine {
            x1: from.x,
            y1: flip(from.y),
            x2: to.x,
            y2: flip(to.y),
            color: color(*role, tokens),
        }),
        DrawCommand::Polyline {
            points, color: role, ..
        } => {
            let color = color(*role, tokens);
            for pair in points.windows(2) {
                ctx.draw(&CanvasLine {
                    x1: pair[0].x,
                    y1: flip(pair[0].y),
                    x2: pair[1].x,
                    y2: flip(pair[1].y),
                    color,
                });
            }
        }
        DrawCommand::FillPath {
            points, color: role, ..
        } => {
            // Area under a curve: the last two points close along the floor
            let Some(floor) = points.last().map(|point| flip(point.y)) else {
                return;
            };
            let color = color(*role, tokens);
            for point in &points[..points.len().saturating_sub(2)] {
                ctx.draw(&CanvasLine {
                    x1: point.x,
                    y1: flip(point.y),
                    x2: point.x,
                    y2: floor,
                    color,
                });
            }
        }
        DrawCommand::Rect {
            x,
            y,
            width,
            height: rect_height,
            fill,
            ..
        } => {
            // Background fills are handled by the canvas itself
            if *fill == ColorRole::Background || *rect_height <= 0.0 {
                return;
            }
            let center = x + width / 2.0;
            ctx.draw(&CanvasLine {
                x1: center,
                y1: flip(*y),
                x2: center,
                y2: flip(y + rect_height),
                color: color(*fill, tokens),
            });
        }
        DrawCommand::Text {
            x,
            y,
            text,
            color: role,
            align,
            bold,
        } => {
            let advance = text.chars().count() as f64 * PX_PER_COL;
            let x = match align {
                TextAlign::Left => *x,
                TextAlign::Center => x - advance / 2.0,
                TextAlign::Right => x - advance,
            };
            let mut style = Style::default().fg(color(*role, tokens));
            if *bold {
                style = style.add_modifier(Modifier::BOLD);
            }
            ctx.print(x.max(0.0), flip(*y), Line::styled(text.clone(), style));
        }
        DrawCommand::Circle {
            center,
            radius,
            fill,
            outline,
        } => ctx.draw(&Circle {
            x: center.x,
            y: flip(center.y),
            radius: *radius,
            color: color(outline.unwrap_or(*fill), tokens),
        }),
    }
}

fn change_style(value: Option<f64>, tokens: &ColorTokens) -> Style {
    match value {
        Some(value) => Style::default().fg(color(ColorRole::for_change(value), tokens)),
        None => Style::default().fg(color(ColorRole::Text, tokens)),
    }
}

fn render_info(f: &mut Frame, area: Rect, info: Option<&InfoSummary>, tokens: &ColorTokens) {
    let Some(info) = info else {
        return;
    };

    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(color(ColorRole::Text, tokens));
    let trend = change_style(info.change, tokens);
    let optional_price = |price: Option<f64>| price.map_or_else(|| "--".to_string(), format_price);

    let line = Line::from(vec![
        Span::styled(
            format!("{} ", format_price(info.current)),
            trend.add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{} ", format_change(info.change)), trend),
        Span::styled(format!("{}  ", format_percent(info.change_percent)), trend),
        Span::styled("Vol ", label),
        Span::styled(format!("{}  ", format_number(info.last_volume as f64)), value),
        Span::styled("Open ", label),
        Span::styled(format!("{}  ", optional_price(info.open)), value),
        Span::styled("Avg ", label),
        Span::styled(
            format!("{}  ", format_price(info.avg_price)),
            Style::default().fg(color(ColorRole::Average, tokens)),
        ),
        Span::styled("High ", label),
        Span::styled(
            format!("{}  ", format_price(info.high)),
            Style::default().fg(color(ColorRole::UpBar, tokens)),
        ),
        Span::styled("Low ", label),
        Span::styled(
            format_price(info.low),
            Style::default().fg(color(ColorRole::DownBar, tokens)),
        ),
    ]);

    f.render_widget(Paragraph::new(line), area);
}

fn render_tooltip(
    f: &mut Frame,
    area: Rect,
    tooltip: Option<&TooltipContent>,
    tokens: &ColorTokens,
) {
    let block = Block::default().borders(Borders::LEFT).title(" Tick ");
    let Some(tooltip) = tooltip else {
        let hint = Paragraph::new("Hover the chart or click\nthe time axis to inspect.")
            .block(block)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        f.render_widget(hint, area);
        return;
    };

    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(color(ColorRole::Text, tokens));
    let trend = change_style(tooltip.change, tokens);
    let row = |name: &'static str, text: String, style: Style| {
        Line::from(vec![Span::styled(format!("{name:<7}"), label), Span::styled(text, style)])
    };

    let lines = vec![
        Line::from(Span::styled(
            tooltip.time_label.clone(),
            value.add_modifier(Modifier::BOLD),
        )),
        row("Price", format_price(tooltip.price), value.add_modifier(Modifier::BOLD)),
        row(
            "Avg",
            tooltip.avg_price.map_or_else(|| "--".to_string(), format_price),
            Style::default().fg(color(ColorRole::Average, tokens)),
        ),
        row(
            "Change",
            format!(
                "{} ({})",
                format_change(tooltip.change),
                format_percent(tooltip.change_percent)
            ),
            trend,
        ),
        row("Volume", format_number(tooltip.volume as f64), value),
        row("Amount", format_number(tooltip.amount), value),
    ];

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status(f: &mut Frame, area: Rect, status: &Status) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", status.coordinate_type),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(format!(
            " {} | {}/{} ticks | scroll {:.2}{} ",
            status.theme,
            status.len,
            status.capacity,
            status.scroll_position,
            if status.paused { " | PAUSED" } else { "" },
        )),
        Span::styled(
            "q quit  t theme  c mode  a avg  x cross  i info  s scroll  p pause  ←/→ Home/End",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
