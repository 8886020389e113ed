use crate::kernel::action::{PowerMode, VoiceProfile};
use crate::kernel::collaborators::BatteryStatus;

/// PURE FUNCTION: greeting for the local hour (0-23).
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good Morning!",
        12..=17 => "Good Afternoon!",
        _ => "Good Evening!",
    }
}

pub fn introduction(name: &str) -> String {
    format!("I am your AI Assistant {}. How can I help you?", name)
}

pub fn farewell(name: &str) -> String {
    format!("Goodbye! {} is shutting down. Have a nice day.", name)
}

pub fn power_announcement(mode: PowerMode) -> &'static str {
    match mode {
        PowerMode::Shutdown => "Shutting down your computer.",
        PowerMode::Restart => "Restarting your computer.",
        PowerMode::Logout => "Logging out now.",
    }
}

pub fn voice_confirmation(voice: VoiceProfile) -> &'static str {
    match voice {
        VoiceProfile::Male => "I will now speak in a male voice.",
        VoiceProfile::Female => "I will now speak in a female voice.",
    }
}

pub fn plug_state(status: &BatteryStatus) -> &'static str {
    if status.plugged {
        "Plugged In"
    } else {
        "Not Plugged In"
    }
}

pub fn battery_sentence(status: &BatteryStatus) -> String {
    format!("Battery is at {} percent and it is {}", status.percent, plug_state(status))
}

/// Static command listing shown by "help".
pub fn help_listing(name: &str) -> String {
    let commands = [
        ("time", "Get current time"),
        ("open youtube", "Open YouTube"),
        ("open google", "Open Google"),
        ("play <song>", "Play song on YouTube"),
        ("search <query>", "Google search"),
        ("open notepad/calculator/chrome", "Open apps"),
        ("shutdown / restart / logout", "System control"),
        ("screenshot", "Take screenshot"),
        ("mute", "Mute system volume"),
        ("battery", "Show battery percentage"),
        ("take a note", "Save a note"),
        ("read notes", "Read saved notes"),
        ("voice male/female", "Change assistant voice"),
        ("help", "Show this help menu"),
        ("exit / quit", "Exit assistant"),
    ];

    let mut text = format!("=== {} - Available Commands ===\n", name);
    for (i, (command, description)) in commands.iter().enumerate() {
        text.push_str(&format!("{:>2}. {:<32} - {}\n", i + 1, command, description));
    }
    text
}
