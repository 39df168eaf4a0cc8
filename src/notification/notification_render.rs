//! Notification rendering
//!
//! Renders the notification overlay in the top-right corner of the frame.
//! Call after the main UI so the notification appears on top.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::notification_state::NotificationState;

pub fn render_notification(frame: &mut Frame, notification: &mut NotificationState) {
    // Clear expired notifications first
    notification.clear_if_expired();

    let Some(notif) = notification.current() else {
        return;
    };

    let message = &notif.message;
    let style = &notif.style;

    // Width: message + padding (2 chars each side counting borders)
    let notification_width = message.len() as u16 + 4;
    let notification_height = 3;

    // Position in top-right corner with a small margin
    let frame_area = frame.area();
    let margin = 2;
    let notification_area = Rect {
        x: frame_area.width.saturating_sub(notification_width + margin),
        y: margin,
        width: notification_width.min(frame_area.width.saturating_sub(margin * 2)),
        height: notification_height.min(frame_area.height.saturating_sub(margin * 2)),
    };

    // Don't render if area is too small
    if notification_area.width < 5 || notification_area.height < 3 {
        return;
    }

    // Clear background for floating effect
    frame.render_widget(Clear, notification_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(style.border).bg(style.bg))
        .style(Style::default().bg(style.bg));

    let text = Line::from(Span::styled(
        format!(" {} ", message),
        Style::default().fg(style.fg).bg(style.bg),
    ));

    frame.render_widget(Paragraph::new(text).block(block), notification_area);
}
