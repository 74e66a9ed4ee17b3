use super::types::{Hymn, ResolvedProgram, ResolvedSpeaker, SpeakerIdentity, DEFAULT_PROGRAM_TITLE};
use crate::directory::Member;

/// One element of the rendered document stream, in reading order. The sink
/// decides what each element looks like in its output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocElement {
    /// The program title, large and centered.
    Title(String),
    /// A centered secondary line (date, theme).
    Centered(String),
    /// A section heading.
    SectionHeader(String),
    /// A body line.
    Line(String),
    /// Small print at the very end (admin copies only).
    Footer(String),
    /// Vertical gap between sections.
    Spacer,
}

/// Receives the element stream. `Vec<DocElement>` collects it verbatim;
/// the application's PDF writer paginates it.
pub trait DocumentSink {
    fn element(&mut self, element: DocElement);
}

impl DocumentSink for Vec<DocElement> {
    fn element(&mut self, element: DocElement) {
        self.push(element);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Admin copies get a title suffix and a program-id footer.
    pub admin: bool,
}

/// Formats a hymn line: `"Opening Hymn: #3 – Nearer My God to Thee"`, or
/// the placeholder when the hymn is absent or incomplete.
pub fn hymn_line(label: &str, hymn: Option<&Hymn>) -> String {
    match hymn {
        Some(h) if !h.number.is_empty() && !h.title.is_empty() => {
            format!("{label}: #{} – {}", h.number, h.title)
        }
        _ => format!("{label}: —"),
    }
}

fn name_or_dash(member: Option<&Member>) -> String {
    member
        .map(Member::full_name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "—".to_string())
}

/// Speakers in rendering order: ascending by `order`, missing treated as 0,
/// ties keeping submission order (`sort_by_key` is stable).
fn sorted_speakers(speakers: &[ResolvedSpeaker]) -> Vec<&ResolvedSpeaker> {
    let mut sorted: Vec<&ResolvedSpeaker> = speakers.iter().collect();
    sorted.sort_by_key(|s| s.speaker.order.unwrap_or(0));
    sorted
}

type SectionBuilder = fn(&ResolvedProgram, &mut dyn DocumentSink);

fn theme_section(p: &ResolvedProgram, sink: &mut dyn DocumentSink) {
    if let Some(theme) = &p.program.theme {
        sink.element(DocElement::Centered(format!("Theme: {theme}")));
    }
    sink.element(DocElement::Spacer);
}

fn announcements_section(p: &ResolvedProgram, sink: &mut dyn DocumentSink) {
    sink.element(DocElement::SectionHeader("Announcements".to_string()));
    sink.element(DocElement::Line(p.program.announcements.clone()));
    sink.element(DocElement::Spacer);
}

fn business_section(p: &ResolvedProgram, sink: &mut dyn DocumentSink) {
    sink.element(DocElement::SectionHeader(
        "Stake & Ward Business".to_string(),
    ));
    if !p.program.stake_business.is_empty() {
        sink.element(DocElement::Line(format!(
            "Stake Business: {}",
            p.program.stake_business
        )));
    }
    if !p.program.ward_business.is_empty() {
        sink.element(DocElement::Line(format!(
            "Ward Business: {}",
            p.program.ward_business
        )));
    }
    sink.element(DocElement::Spacer);
}

fn greeter_section(p: &ResolvedProgram, sink: &mut dyn DocumentSink) {
    sink.element(DocElement::Line(format!("Greeter: {}", p.program.greeter)));
    sink.element(DocElement::Spacer);
}

fn leadership_section(p: &ResolvedProgram, sink: &mut dyn DocumentSink) {
    sink.element(DocElement::SectionHeader(
        "Presiding & Conducting".to_string(),
    ));
    sink.element(DocElement::Line(format!(
        "Presiding: {}",
        name_or_dash(p.presiding.as_ref())
    )));
    sink.element(DocElement::Line(format!(
        "Conducting: {}",
        name_or_dash(p.conducting.as_ref())
    )));
    sink.element(DocElement::Line(format!(
        "Organist: {}",
        name_or_dash(p.organist.as_ref())
    )));
    sink.element(DocElement::Line(format!(
        "Chorister: {}",
        name_or_dash(p.chorister.as_ref())
    )));
    sink.element(DocElement::Spacer);
}

fn opening_section(p: &ResolvedProgram, sink: &mut dyn DocumentSink) {
    sink.element(DocElement::SectionHeader("Opening".to_string()));
    sink.element(DocElement::Line(hymn_line(
        "Opening Hymn",
        p.program.opening_hymn.as_ref(),
    )));
    sink.element(DocElement::Line(format!(
        "Invocation: {}",
        name_or_dash(p.opening_prayer.as_ref())
    )));
    sink.element(DocElement::Spacer);
}

fn sacrament_section(p: &ResolvedProgram, sink: &mut dyn DocumentSink) {
    sink.element(DocElement::SectionHeader("Sacrament".to_string()));
    sink.element(DocElement::Line(hymn_line(
        "Sacrament Hymn",
        p.program.sacrament_hymn.as_ref(),
    )));
    sink.element(DocElement::Line(
        "Administration of the Sacrament".to_string(),
    ));
    sink.element(DocElement::Spacer);
}

fn speakers_section(p: &ResolvedProgram, sink: &mut dyn DocumentSink) {
    sink.element(DocElement::SectionHeader("Speakers".to_string()));
    for (index, resolved) in sorted_speakers(&p.speakers).into_iter().enumerate() {
        let name = SpeakerIdentity::of(resolved).display_name(index);
        let line = match resolved.speaker.topic.as_deref().filter(|t| !t.is_empty()) {
            Some(topic) => format!("{name} — {topic}"),
            None => name,
        };
        sink.element(DocElement::Line(line));
    }
    sink.element(DocElement::Spacer);
}

fn testimonies_section(_p: &ResolvedProgram, sink: &mut dyn DocumentSink) {
    sink.element(DocElement::Line("Bearing of Testimonies".to_string()));
    sink.element(DocElement::Spacer);
}

fn intermediate_section(p: &ResolvedProgram, sink: &mut dyn DocumentSink) {
    sink.element(DocElement::SectionHeader("Intermediate Hymn".to_string()));
    sink.element(DocElement::Line(hymn_line(
        "Intermediate Hymn",
        p.program.intermediate_hymn.as_ref(),
    )));
    sink.element(DocElement::Spacer);
}

fn closing_section(p: &ResolvedProgram, sink: &mut dyn DocumentSink) {
    sink.element(DocElement::SectionHeader("Closing".to_string()));
    sink.element(DocElement::Line(hymn_line(
        "Closing Hymn",
        p.program.closing_hymn.as_ref(),
    )));
    sink.element(DocElement::Line(format!(
        "Benediction: {}",
        name_or_dash(p.closing_prayer.as_ref())
    )));
    sink.element(DocElement::Spacer);
}

fn second_hour_section(p: &ResolvedProgram, sink: &mut dyn DocumentSink) {
    sink.element(DocElement::SectionHeader("Second Hour".to_string()));
    let program = &p.program;
    let line = if program.second_hour_type == "Other" && !program.second_hour_other_text.is_empty()
    {
        program.second_hour_other_text.clone()
    } else if !program.second_hour_type.is_empty() {
        program.second_hour_type.clone()
    } else {
        "—".to_string()
    };
    sink.element(DocElement::Line(line));
}

/// Renders the program into the sink as a flat element stream.
///
/// The optional sections are an ordered table of (presence, builder) pairs;
/// mandatory sections have their predicate fixed to `true`. Missing data
/// never fails rendering; every absent name or hymn becomes a placeholder.
pub fn render_program(
    resolved: &ResolvedProgram,
    options: &RenderOptions,
    sink: &mut dyn DocumentSink,
) {
    let program = &resolved.program;

    let title = if program.title.is_empty() {
        DEFAULT_PROGRAM_TITLE
    } else {
        program.title.as_str()
    };
    let suffix = if options.admin { " (Admin Copy)" } else { "" };
    sink.element(DocElement::Title(format!("{title}{suffix}")));
    sink.element(DocElement::Centered(
        program.date.format("%Y-%m-%d").to_string(),
    ));

    let sections: [(bool, SectionBuilder); 12] = [
        (
            program.theme.as_deref().is_some_and(|t| !t.is_empty()),
            theme_section,
        ),
        (!program.announcements.is_empty(), announcements_section),
        (
            !program.stake_business.is_empty() || !program.ward_business.is_empty(),
            business_section,
        ),
        (!program.greeter.is_empty(), greeter_section),
        (true, leadership_section),
        (true, opening_section),
        (true, sacrament_section),
        (!resolved.speakers.is_empty(), speakers_section),
        (program.include_bearing_of_testimonies, testimonies_section),
        (
            program
                .intermediate_hymn
                .as_ref()
                .is_some_and(|h| !h.number.is_empty()),
            intermediate_section,
        ),
        (true, closing_section),
        (true, second_hour_section),
    ];

    for (present, build) in sections {
        if present {
            build(resolved, sink);
        }
    }

    if options.admin {
        sink.element(DocElement::Spacer);
        sink.element(DocElement::Footer(format!(
            "Admin Copy — Program ID: {}",
            program.id
        )));
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::program::{Program, Speaker};

    fn empty_program() -> ResolvedProgram {
        let date = NaiveDate::from_ymd_opt(2025, 6, 8).unwrap();
        ResolvedProgram::unresolved(Program::new(date))
    }

    fn render(resolved: &ResolvedProgram, admin: bool) -> Vec<DocElement> {
        let mut elements = Vec::new();
        render_program(resolved, &RenderOptions { admin }, &mut elements);
        elements
    }

    fn lines(elements: &[DocElement]) -> Vec<&str> {
        elements
            .iter()
            .filter_map(|e| match e {
                DocElement::Line(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn headers(elements: &[DocElement]) -> Vec<&str> {
        elements
            .iter()
            .filter_map(|e| match e {
                DocElement::SectionHeader(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_program_renders_mandatory_sections_with_placeholders() {
        let elements = render(&empty_program(), false);

        assert_eq!(
            headers(&elements),
            vec![
                "Presiding & Conducting",
                "Opening",
                "Sacrament",
                "Closing",
                "Second Hour"
            ]
        );

        let body = lines(&elements);
        assert!(body.contains(&"Presiding: —"));
        assert!(body.contains(&"Conducting: —"));
        assert!(body.contains(&"Organist: —"));
        assert!(body.contains(&"Chorister: —"));
        assert!(body.contains(&"Opening Hymn: —"));
        assert!(body.contains(&"Invocation: —"));
        assert!(body.contains(&"Closing Hymn: —"));
        assert!(body.contains(&"Benediction: —"));
        // Second hour falls back to its default, not the placeholder.
        assert!(body.contains(&"Sunday School"));
    }

    #[test]
    fn test_title_and_date() {
        let elements = render(&empty_program(), false);
        assert_eq!(
            elements[0],
            DocElement::Title("Sacrament Meeting".to_string())
        );
        assert_eq!(elements[1], DocElement::Centered("2025-06-08".to_string()));
    }

    #[test]
    fn test_admin_copy_title_and_footer() {
        let resolved = empty_program();
        let id = resolved.program.id;

        let admin = render(&resolved, true);
        assert_eq!(
            admin[0],
            DocElement::Title("Sacrament Meeting (Admin Copy)".to_string())
        );
        assert!(admin
            .iter()
            .any(|e| *e == DocElement::Footer(format!("Admin Copy — Program ID: {id}"))));

        let public = render(&resolved, false);
        assert!(!public
            .iter()
            .any(|e| matches!(e, DocElement::Footer(_))));
    }

    #[test]
    fn test_hymn_line_formats() {
        let hymn = Hymn {
            number: "3".to_string(),
            title: "Nearer My God to Thee".to_string(),
        };
        assert_eq!(
            hymn_line("Opening Hymn", Some(&hymn)),
            "Opening Hymn: #3 – Nearer My God to Thee"
        );
        assert_eq!(hymn_line("Opening Hymn", None), "Opening Hymn: —");

        let number_only = Hymn {
            number: "3".to_string(),
            title: String::new(),
        };
        assert_eq!(hymn_line("Opening Hymn", Some(&number_only)), "Opening Hymn: —");
    }

    #[test]
    fn test_speakers_sorted_with_missing_order_first() {
        let mut resolved = empty_program();
        for (name, order) in [
            ("Third", Some(3)),
            ("First", Some(1)),
            ("Unordered", None),
            ("Second", Some(2)),
        ] {
            resolved.speakers.push(ResolvedSpeaker {
                speaker: Speaker {
                    other_name: Some(name.to_string()),
                    order,
                    ..Default::default()
                },
                member: None,
            });
        }

        let elements = render(&resolved, false);
        let start = elements
            .iter()
            .position(|e| *e == DocElement::SectionHeader("Speakers".to_string()))
            .expect("speakers section present");
        let spoken: Vec<&str> = elements[start + 1..]
            .iter()
            .take_while(|e| matches!(e, DocElement::Line(_)))
            .filter_map(|e| match e {
                DocElement::Line(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(spoken, vec!["Unordered", "First", "Second", "Third"]);
    }

    #[test]
    fn test_zero_order_ties_keep_submission_order() {
        let mut resolved = empty_program();
        for (name, order) in [("A", None), ("B", Some(0)), ("C", None)] {
            resolved.speakers.push(ResolvedSpeaker {
                speaker: Speaker {
                    other_name: Some(name.to_string()),
                    order,
                    ..Default::default()
                },
                member: None,
            });
        }

        let elements = render(&resolved, false);
        let body = lines(&elements);
        let a = body.iter().position(|l| *l == "A").unwrap();
        let b = body.iter().position(|l| *l == "B").unwrap();
        let c = body.iter().position(|l| *l == "C").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_speaker_topic_formatting_and_positional_fallback() {
        let mut resolved = empty_program();
        resolved.speakers.push(ResolvedSpeaker {
            speaker: Speaker {
                other_name: Some("Sister Young".to_string()),
                topic: Some("Charity".to_string()),
                ..Default::default()
            },
            member: None,
        });
        resolved.speakers.push(ResolvedSpeaker {
            speaker: Speaker {
                topic: Some("Faith".to_string()),
                ..Default::default()
            },
            member: None,
        });

        let body_elements = render(&resolved, false);
        let body = lines(&body_elements);
        assert!(body.contains(&"Sister Young — Charity"));
        assert!(body.contains(&"Speaker 2 — Faith"));
    }

    #[test]
    fn test_optional_sections_appear_when_present() {
        let mut resolved = empty_program();
        resolved.program.theme = Some("Gratitude".to_string());
        resolved.program.announcements = "Ward picnic Saturday".to_string();
        resolved.program.ward_business = "Sustainings".to_string();
        resolved.program.greeter = "Brother Call".to_string();
        resolved.program.include_bearing_of_testimonies = true;
        resolved.program.intermediate_hymn = Hymn::from_form("98", "I Need Thee Every Hour");

        let elements = render(&resolved, false);
        assert!(elements.contains(&DocElement::Centered("Theme: Gratitude".to_string())));
        assert!(headers(&elements).contains(&"Announcements"));
        assert!(headers(&elements).contains(&"Stake & Ward Business"));
        assert!(headers(&elements).contains(&"Intermediate Hymn"));
        let body = lines(&elements);
        assert!(body.contains(&"Ward Business: Sustainings"));
        assert!(!body.iter().any(|l| l.starts_with("Stake Business:")));
        assert!(body.contains(&"Greeter: Brother Call"));
        assert!(body.contains(&"Bearing of Testimonies"));
    }

    #[test]
    fn test_second_hour_other_override() {
        let mut resolved = empty_program();
        resolved.program.second_hour_type = "Other".to_string();
        resolved.program.second_hour_other_text = "Temple preparation".to_string();
        let body_elements = render(&resolved, false);
        assert!(lines(&body_elements).contains(&"Temple preparation"));

        // "Other" with no override renders the type itself.
        resolved.program.second_hour_other_text.clear();
        let body_elements = render(&resolved, false);
        assert!(lines(&body_elements).contains(&"Other"));

        // An empty type gets the placeholder.
        resolved.program.second_hour_type.clear();
        let body_elements = render(&resolved, false);
        assert!(lines(&body_elements).contains(&"—"));
    }

    #[test]
    fn test_section_order_is_fixed() {
        let mut resolved = empty_program();
        resolved.program.announcements = "News".to_string();
        resolved.speakers.push(ResolvedSpeaker {
            speaker: Speaker {
                other_name: Some("Sister Young".to_string()),
                ..Default::default()
            },
            member: None,
        });

        let elements = render(&resolved, false);
        assert_eq!(
            headers(&elements),
            vec![
                "Announcements",
                "Presiding & Conducting",
                "Opening",
                "Sacrament",
                "Speakers",
                "Closing",
                "Second Hour"
            ]
        );
    }
}
