use chrono::Utc;
use lunoch::{phase, search, CivilTimestamp, JulianDate};

fn main() {
    let now = CivilTimestamp::from(Utc::now());
    let jd = now.to_astronomical_time();
    let report = phase::evaluate(jd);

    println!("{now}  ({jd})");
    println!(
        "{} ({:.0}% {}), age {}",
        report.name(),
        report.illuminated * 100.0,
        if report.is_waxing() { '+' } else { '-' },
        report.age
    );
    println!("Moon distance: {:.0} km", report.moon_distance_km);

    match search::upcoming(jd) {
        Ok(next) => {
            let mut events = [("new moon", next.new_moon), ("full moon", next.full_moon)];
            events.sort_by(|a, b| a.1.value().total_cmp(&b.1.value()));
            for (label, when) in events {
                println!("Next {label}: {}", show(when));
            }
        }
        Err(err) => println!("Next phases unknown: {err}"),
    }
}

fn show(jd: JulianDate) -> String {
    CivilTimestamp::from_astronomical_time(jd)
        .map(|c| c.to_string())
        .unwrap_or_else(|_| "unknown".into())
}
