use ratatui::layout::{Constraint, Layout, Rect};

/// Height of one service card on the Integrations screen (borders included).
pub const SERVICE_CARD_HEIGHT: u16 = 5;

pub struct RunAreas {
    pub header: Rect,
    pub card: Rect,
    pub template: Rect,
    pub status: Rect,
    pub footer: Rect,
}

pub struct IntegrationsAreas {
    pub header: Rect,
    pub services: Vec<Rect>,
    pub note: Rect,
    pub footer: Rect,
}

pub fn run_areas(area: Rect) -> RunAreas {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .split(area);
    RunAreas {
        header: chunks[0],
        card: chunks[1],
        template: chunks[2],
        status: chunks[3],
        footer: chunks[4],
    }
}

pub fn integrations_areas(area: Rect, service_count: usize) -> IntegrationsAreas {
    let mut constraints = vec![Constraint::Length(3)];
    constraints.extend(std::iter::repeat_n(
        Constraint::Length(SERVICE_CARD_HEIGHT),
        service_count,
    ));
    constraints.push(Constraint::Min(2));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::vertical(constraints).split(area);
    let last = chunks.len() - 1;
    IntegrationsAreas {
        header: chunks[0],
        services: chunks[1..=service_count].to_vec(),
        note: chunks[last - 1],
        footer: chunks[last],
    }
}
