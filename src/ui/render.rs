use crate::core::{ChainState, NoticeLevel, PanelSnapshot};
use crate::models::Transaction;
use crate::ui::{FormField, InputMode, UiState};
use chrono::{DateTime, Local};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

pub const HASH_PREFIX_LEN: usize = 15;

/// One rendered line of the block list: a (node, block) pair. Rows are derived
/// from the current snapshot alone, so every redraw is a full rebuild.
#[derive(Debug, Clone)]
pub struct BlockRow {
    pub endpoint: String,
    pub index: u64,
    pub hash_prefix: String,
    pub timestamp: Option<f64>,
    pub proof: Option<u64>,
    pub transactions: Vec<Transaction>,
}

pub fn short_hash(hash: &str) -> String {
    let prefix: String = hash.chars().take(HASH_PREFIX_LEN).collect();
    if hash.chars().count() > HASH_PREFIX_LEN {
        format!("{prefix}...")
    } else {
        prefix
    }
}

/// Flattens a snapshot into display rows: nodes in declared order, blocks in
/// node-reported order. Unreachable nodes contribute nothing.
pub fn block_rows(snapshot: &PanelSnapshot) -> Vec<BlockRow> {
    let mut rows = Vec::new();
    for node in &snapshot.nodes {
        let ChainState::Chain(blocks) = &node.state else {
            continue;
        };
        for block in blocks {
            rows.push(BlockRow {
                endpoint: node.endpoint.clone(),
                index: block.index,
                hash_prefix: short_hash(&block.previous_hash),
                timestamp: block.timestamp,
                proof: block.proof,
                transactions: block.transactions.clone(),
            });
        }
    }
    rows
}

pub fn row_label(row: &BlockRow) -> String {
    let mut label = format!(
        "{}  block #{}  prev {}  {} tx",
        row.endpoint,
        row.index,
        row.hash_prefix,
        row.transactions.len()
    );
    if let Some(proof) = row.proof {
        label.push_str(&format!("  proof {proof}"));
    }
    if let Some(mined_at) = row
        .timestamp
        .and_then(|ts| DateTime::from_timestamp(ts as i64, 0))
    {
        label.push_str(&format!(
            "  mined {}",
            mined_at.with_timezone(&Local).format("%H:%M:%S")
        ));
    }
    label
}

/// Transaction detail shown by the popup viewer, pretty-printed and unmodified.
pub fn format_transactions(transactions: &[Transaction]) -> String {
    serde_json::to_string_pretty(transactions).unwrap_or_else(|_| "[]".to_string())
}

pub fn draw(frame: &mut Frame, snapshot: &PanelSnapshot, rows: &[BlockRow], state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(frame.size());

    draw_form(frame, chunks[0], state);
    draw_blocks(frame, chunks[1], rows, state);
    draw_status(frame, chunks[2], snapshot, state);

    if let Some(detail) = &state.detail {
        draw_detail(frame, detail);
    }
}

fn field_style(state: &UiState, field: FormField) -> Style {
    if matches!(state.input_mode, InputMode::Editing) && state.focus == field {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn draw_form(frame: &mut Frame, area: Rect, state: &UiState) {
    let form = state.current_form();
    let lines = vec![
        Line::from(vec![
            Span::raw("node:      "),
            Span::styled(
                state.current_endpoint().to_string(),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw("  (Tab switches node)"),
        ]),
        Line::from(vec![
            Span::raw("amount:    "),
            Span::styled(form.amount.clone(), field_style(state, FormField::Amount)),
        ]),
        Line::from(vec![
            Span::raw("sender:    "),
            Span::styled(form.sender.clone(), field_style(state, FormField::Sender)),
        ]),
        Line::from(vec![
            Span::raw("recipient: "),
            Span::styled(
                form.recipient.clone(),
                field_style(state, FormField::Recipient),
            ),
        ]),
        Line::from(Span::styled(
            match state.input_mode {
                InputMode::Normal => "e edit  s submit  Enter view txs  q quit",
                InputMode::Editing => "Tab next field  Enter submit  Esc done",
            },
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let form_widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("new transaction"),
    );
    frame.render_widget(form_widget, area);
}

fn draw_blocks(frame: &mut Frame, area: Rect, rows: &[BlockRow], state: &UiState) {
    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| ListItem::new(row_label(row)))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("blocks"))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    if !rows.is_empty() {
        list_state.select(Some(state.selected_row.min(rows.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_status(frame: &mut Frame, area: Rect, snapshot: &PanelSnapshot, state: &UiState) {
    let mut spans = Vec::new();
    if let Some(notice) = &state.status {
        let color = match notice.level {
            NoticeLevel::Info => Color::Green,
            NoticeLevel::Error => Color::Red,
        };
        spans.push(Span::styled(
            notice.text.clone(),
            Style::default().fg(color),
        ));
        spans.push(Span::raw("  "));
    }
    match snapshot.taken_at {
        Some(taken_at) => spans.push(Span::styled(
            format!(
                "last refresh {}",
                taken_at.with_timezone(&Local).format("%H:%M:%S")
            ),
            Style::default().fg(Color::DarkGray),
        )),
        None => spans.push(Span::styled(
            "waiting for first poll cycle...",
            Style::default().fg(Color::DarkGray),
        )),
    }

    let status = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("status"));
    frame.render_widget(status, area);
}

fn draw_detail(frame: &mut Frame, detail: &str) {
    let area = centered_rect(60, 70, frame.size());
    let popup = Paragraph::new(detail.to_string())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("transactions (Esc closes)"),
        );
    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChainState, NodeSnapshot};
    use crate::models::Block;
    use chrono::Utc;

    fn block(index: u64, previous_hash: &str, transactions: Vec<Transaction>) -> Block {
        Block {
            index,
            previous_hash: previous_hash.to_string(),
            transactions,
            timestamp: None,
            proof: None,
        }
    }

    fn snapshot(nodes: Vec<NodeSnapshot>) -> PanelSnapshot {
        PanelSnapshot {
            taken_at: Some(Utc::now()),
            nodes,
        }
    }

    #[test]
    fn short_hash_truncates_to_fifteen_characters() {
        let hash = "a3f1b2c4d5e6f7a8b9c0d1e2f3a4b5c6";
        assert_eq!(short_hash(hash), "a3f1b2c4d5e6f7a...");
        // The genesis previous_hash is just "1" and stays untouched.
        assert_eq!(short_hash("1"), "1");
    }

    #[test]
    fn unreachable_node_contributes_no_rows_and_others_are_unaffected() {
        let snap = snapshot(vec![
            NodeSnapshot {
                endpoint: "http://127.0.0.1:5000".into(),
                state: ChainState::Chain(vec![block(1, "1", Vec::new())]),
            },
            NodeSnapshot {
                endpoint: "http://127.0.0.1:5001".into(),
                state: ChainState::Unreachable,
            },
            NodeSnapshot {
                endpoint: "http://127.0.0.1:5002".into(),
                state: ChainState::Chain(vec![
                    block(1, "1", Vec::new()),
                    block(2, "9e107d9d372bb6826bd81d3542a419d6", Vec::new()),
                ]),
            },
        ]);

        let rows = block_rows(&snap);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| !r.endpoint.ends_with(":5001")));
        assert_eq!(rows[0].endpoint, "http://127.0.0.1:5000");
        assert_eq!(rows[1].endpoint, "http://127.0.0.1:5002");
        assert_eq!(rows[2].index, 2);
        assert_eq!(rows[2].hash_prefix, "9e107d9d372bb68...");
    }

    #[test]
    fn rows_come_only_from_the_given_snapshot() {
        let first = snapshot(vec![NodeSnapshot {
            endpoint: "http://127.0.0.1:5000".into(),
            state: ChainState::Chain(vec![block(1, "1", Vec::new()), block(2, "aa", Vec::new())]),
        }]);
        let second = snapshot(vec![NodeSnapshot {
            endpoint: "http://127.0.0.1:5000".into(),
            state: ChainState::Chain(vec![block(1, "1", Vec::new())]),
        }]);

        assert_eq!(block_rows(&first).len(), 2);
        // No accumulation across cycles: the shorter snapshot renders shorter.
        assert_eq!(block_rows(&second).len(), 1);
    }

    #[test]
    fn detail_viewer_pretty_prints_the_list_unmodified() {
        let transactions = vec![Transaction {
            sender: "a".into(),
            recipient: "b".into(),
            amount: 1.0,
        }];

        let expected = "[\n  {\n    \"sender\": \"a\",\n    \"recipient\": \"b\",\n    \"amount\": 1.0\n  }\n]";
        assert_eq!(format_transactions(&transactions), expected);
    }

    #[test]
    fn row_label_shows_endpoint_index_prefix_and_tx_count() {
        let row = BlockRow {
            endpoint: "http://127.0.0.1:5000".into(),
            index: 3,
            hash_prefix: "9e107d9d372bb68...".into(),
            timestamp: None,
            proof: Some(35293),
            transactions: vec![Transaction {
                sender: "a".into(),
                recipient: "b".into(),
                amount: 1.0,
            }],
        };

        assert_eq!(
            row_label(&row),
            "http://127.0.0.1:5000  block #3  prev 9e107d9d372bb68...  1 tx  proof 35293"
        );
    }
}
