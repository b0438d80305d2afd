//! The `recite init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("recite.toml").exists() {
        println!("recite.toml already exists, skipping.");
    } else {
        std::fs::write("recite.toml", SAMPLE_CONFIG)?;
        println!("Created recite.toml");
    }

    if std::path::Path::new("quiz_data.txt").exists() {
        println!("quiz_data.txt already exists, skipping.");
    } else {
        std::fs::write("quiz_data.txt", SAMPLE_BANK)?;
        println!("Created quiz_data.txt");
    }

    println!("\nNext steps:");
    println!("  1. Edit recite.toml with your spreadsheet id and Gemini API key");
    println!("  2. Run: recite validate --bank quiz_data.txt");
    println!("  3. Run: recite quiz");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# recite configuration

bank_path = "quiz_data.txt"
default_provider = "gemini"
default_model = "gemini-2.5-flash"
temperature = 0.0

[providers.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"

[grading]
use_ai = true
accept_threshold = 0.95
correction_threshold = 0.98

# Progress is kept in a spreadsheet with two worksheets, `incorrect` and
# `mastered`, each starting with the header row: major, middle, minor, eng, kor, key
[sheets]
spreadsheet_id = "your-spreadsheet-id"
access_token = "${RECITE_SHEETS_TOKEN}"
"#;

const SAMPLE_BANK: &str = "\
[Tenses > Past > Regular]
#Regular verbs take -ed in the past tense.
I walked to school.|나는 학교에 걸어갔다.
She played the piano.|그녀는 피아노를 쳤다.

[Tenses > Past > Irregular]
#Irregular verbs have their own past forms: go → went, eat → ate.
I went home early.|나는 일찍 집에 갔다.
We ate lunch together.|우리는 함께 점심을 먹었다.

[Questions > Wh]
Where are you going?|너 어디 가?
";
