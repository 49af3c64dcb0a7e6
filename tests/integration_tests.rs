use chrono::TimeDelta;
use retrofeed::config::Config;
use retrofeed::fetch::create_http_client_with_timeout;
use retrofeed::fetch::weather::WeatherGovSource;
use retrofeed::scheduler::{PlaylistScheduler, StepOutcome};
use retrofeed::segments::weather::WeatherSegment;
use retrofeed::segments::{FormatOptions, Segment, SegmentInit, SegmentRegistry};
use retrofeed::testing_utils::{RecordingSegment, buffered_writer, instant_settings};
use std::time::Duration;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEED: &str = r#"
[display]
width = 40
force_uppercase = true
show_intros = true

[segments.clock]
module = "date_time"
intro = "Time is on our side"

[segments.numbers]
module = "lucky_numbers.py"
intro = "Time is on our side"

[segments.hello]
module = "template.rs"

[playlist]
segment_pause = 0
order = ["clock", ["clock", { format = "shorttime" }], "ghost", "hello", "numbers"]
"#;

/// Test a config file on disk all the way through registry and scheduler
#[tokio::test]
async fn test_config_to_playlist_end_to_end() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("retrofeed.toml");
    tokio::fs::write(&config_path, FEED).await.unwrap();

    let mut config = Config::load_from_path(&config_path).await.unwrap();
    config.display = retrofeed::DisplaySettings {
        show_intros: true,
        ..instant_settings()
    };

    let client = create_http_client_with_timeout(5).unwrap();
    let (mut out, buffer) = buffered_writer(config.display.clone());
    let registry = SegmentRegistry::build(&config, &client, &mut out).await.unwrap();

    // One shared intro, shown once
    assert_eq!(registry.announced(), ["Time is on our side"]);
    assert_eq!(buffer.contents().matches("TIME IS ON OUR SIDE").count(), 1);

    let mut scheduler = PlaylistScheduler::new(
        out,
        registry,
        config.playlist.order.clone(),
        config.playlist.segment_pause(),
    )
    .unwrap();

    let mut outcomes = Vec::new();
    for _ in 0..6 {
        outcomes.push(scheduler.step().await);
    }
    assert_eq!(
        outcomes,
        vec![
            StepOutcome::Rendered("clock".into()),
            StepOutcome::Rendered("clock".into()),
            StepOutcome::Missing("ghost".into()),
            StepOutcome::Rendered("hello".into()),
            StepOutcome::Rendered("numbers".into()),
            StepOutcome::Rendered("clock".into()),
        ]
    );

    let contents = buffer.contents();
    assert!(contents.contains("MISSING SEGMENT \"GHOST\""));
    assert!(contents.contains("HELLO, WORLD"));
    assert!(contents.contains("YOUR LUCKY NUMBERS FOR TODAY:"));
    assert_eq!(contents.matches("CURRENT TIME IS ").count(), 2);
}

/// Test that an unknown module stops startup
#[tokio::test]
async fn test_unknown_module_fails_build() {
    let config = Config::from_toml_str(
        r#"
[display]

[segments.wx]
module = "mars_weather"

[playlist]
order = ["wx"]
"#,
    )
    .unwrap();
    let client = create_http_client_with_timeout(5).unwrap();
    let (mut out, _buffer) = buffered_writer(instant_settings());
    let result = SegmentRegistry::build(&config, &client, &mut out).await;
    assert!(matches!(
        result,
        Err(retrofeed::AppError::UnknownModule { .. })
    ));
}

/// Test that a failing upstream yields sentinel output and still advances the cache
#[tokio::test]
async fn test_weather_failure_renders_sentinel() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/MapClick.php"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down for maintenance"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_http_client_with_timeout(5).unwrap();
    let source = WeatherGovSource::with_base_url(client, mock_server.uri(), 36.1, -86.7);
    let init = SegmentInit {
        refresh: TimeDelta::minutes(20),
        intro: None,
    };
    let mut segment = WeatherSegment::with_source("wx", init, None, source);
    let (mut out, buffer) = buffered_writer(instant_settings());

    segment.render(&mut out, &FormatOptions::default()).await;
    assert!(!segment.is_stale());
    // fresh cache, so the second render does not fetch again
    segment.render(&mut out, &FormatOptions::default()).await;

    let contents = buffer.contents();
    assert_eq!(contents.matches("[CHECKING FOR WEATHER UPDATES...]").count(), 1);
    assert_eq!(contents.matches("FORECAST NOT AVAILABLE").count(), 2);
    assert!(segment.data().is_some_and(|d| d.report.currently == "N/A"));
}

/// Timer deadlines round up to the next millisecond
fn assert_close(elapsed: Duration, expected: Duration) {
    assert!(
        elapsed >= expected && elapsed < expected + Duration::from_millis(20),
        "elapsed {elapsed:?}, expected about {expected:?}"
    );
}

/// Test the whole step at real pacing, on virtual time
#[tokio::test(start_paused = true)]
async fn test_busy_indicator_pacing() {
    let settings = retrofeed::DisplaySettings {
        beat_seconds: 1.0,
        ..instant_settings()
    };
    let (mut out, buffer) = buffered_writer(settings);
    let segment = RecordingSegment::new("alpha").initially_stale();
    let mut registry = SegmentRegistry::new();
    registry.register("a", Box::new(segment.clone()), &mut out).await;
    let entries = vec![retrofeed::PlaylistEntry::new("a")];
    let mut scheduler =
        PlaylistScheduler::new(out, registry, entries, Duration::from_secs(2)).unwrap();

    let start = tokio::time::Instant::now();
    scheduler.step().await;
    // four beats in the indicator, then the segment pause
    assert_close(start.elapsed(), Duration::from_secs(6));

    let start = tokio::time::Instant::now();
    scheduler.step().await;
    assert_close(start.elapsed(), Duration::from_secs(2));

    assert_eq!(segment.refreshes(), 1);
    assert_eq!(buffer.lines(), vec!["[UPDATING DATA...]", "ALPHA", "ALPHA"]);
}
