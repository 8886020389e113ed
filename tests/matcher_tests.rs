use lumo::kernel::action::{Action, PowerMode, VoiceProfile};
use lumo::kernel::matcher::IntentMatcher;
use lumo::kernel::utterance::Utterance;

fn resolve(text: &str) -> Action {
    IntentMatcher::new().resolve(&Utterance::normalize(text))
}

#[test]
fn test_time_wins_over_everything() {
    assert_eq!(resolve("what time is it"), Action::ReportTime);
    assert_eq!(resolve("time to exit"), Action::ReportTime);
    assert_eq!(resolve("help me with the time"), Action::ReportTime);
    assert_eq!(resolve("open timetable"), Action::ReportTime);
}

#[test]
fn test_help_precedes_exit() {
    assert_eq!(resolve("help me exit"), Action::ShowHelp);
    assert_eq!(resolve("quit asking for help"), Action::ShowHelp);
}

#[test]
fn test_open_extracts_target() {
    assert_eq!(resolve("open notepad"), Action::OpenTarget { target: "notepad".into() });
    assert_eq!(resolve("Open Example"), Action::OpenTarget { target: "example".into() });
    assert_eq!(resolve("open   github"), Action::OpenTarget { target: "github".into() });
}

#[test]
fn test_open_requires_prefix() {
    // Not a prefix: falls through to the knowledge lookup.
    assert_eq!(
        resolve("please open github"),
        Action::KnowledgeLookup { topic: "please open github".into() }
    );
    assert_eq!(resolve("open"), Action::KnowledgeLookup { topic: "open".into() });
}

#[test]
fn test_play_and_search_queries() {
    assert_eq!(resolve("play lofi beats"), Action::PlayMedia { query: "lofi beats".into() });
    assert_eq!(resolve("play"), Action::PlayMedia { query: String::new() });
    assert_eq!(resolve("search rust traits"), Action::WebSearch { query: "rust traits".into() });
    assert_eq!(resolve("  SEARCH  "), Action::WebSearch { query: String::new() });
}

#[test]
fn test_play_keyword_must_stand_alone() {
    assert_eq!(resolve("playground"), Action::KnowledgeLookup { topic: "playground".into() });
    assert_eq!(resolve("searchlight"), Action::KnowledgeLookup { topic: "searchlight".into() });
}

#[test]
fn test_power_rules_in_order() {
    assert_eq!(resolve("shutdown now"), Action::PowerControl(PowerMode::Shutdown));
    assert_eq!(resolve("please restart"), Action::PowerControl(PowerMode::Restart));
    assert_eq!(resolve("logout"), Action::PowerControl(PowerMode::Logout));
    assert_eq!(resolve("restart then shutdown"), Action::PowerControl(PowerMode::Shutdown));
}

#[test]
fn test_simple_contains_rules() {
    assert_eq!(resolve("take a screenshot"), Action::Screenshot);
    assert_eq!(resolve("mute"), Action::MuteVolume);
    assert_eq!(resolve("how is my battery"), Action::ReportBattery);
    assert_eq!(resolve("please take a note"), Action::AddNote);
    assert_eq!(resolve("read notes"), Action::ReadNotes);
    assert_eq!(resolve("HELP"), Action::ShowHelp);
}

#[test]
fn test_screenshot_precedes_mute_and_note() {
    assert_eq!(resolve("screenshot and mute"), Action::Screenshot);
    assert_eq!(resolve("mute and take a note"), Action::MuteVolume);
}

#[test]
fn test_voice_profiles() {
    assert_eq!(resolve("voice male"), Action::SetVoice(VoiceProfile::Male));
    assert_eq!(resolve("change voice to female"), Action::SetVoice(VoiceProfile::Female));
    assert_eq!(resolve("switch to a male voice"), Action::SetVoice(VoiceProfile::Male));
    // "voice" alone selects nothing and falls through.
    assert_eq!(resolve("voice"), Action::KnowledgeLookup { topic: "voice".into() });
    // "male" without "voice" is not a voice command.
    assert_eq!(resolve("male lion"), Action::KnowledgeLookup { topic: "male lion".into() });
}

#[test]
fn test_exit_and_quit_any_case() {
    for text in ["exit", "EXIT", "  Quit  ", "QuIt now", "please exit"] {
        assert_eq!(resolve(text), Action::Exit, "{:?} should exit", text);
    }
}

#[test]
fn test_unmatched_is_knowledge_lookup() {
    assert_eq!(
        resolve("  Albert Einstein "),
        Action::KnowledgeLookup { topic: "albert einstein".into() }
    );
}

#[test]
fn test_rule_names_are_reported() {
    let matcher = IntentMatcher::new();
    let rule = matcher.rule_for(&Utterance::normalize("mute")).unwrap();
    assert_eq!(rule.name, "mute");
    assert!(matcher.rule_for(&Utterance::normalize("paris")).is_none());
    assert_eq!(matcher.rules().len(), 16);
}
