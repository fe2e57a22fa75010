use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{capacity::Capacities, event::ConsumptionEvent, reading::Reading},
    statistics::{Activity, Consumption, Summary},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn liters(value: impl Into<f64>) -> Cell {
    Cell::new(format!("{:.2}", value.into())).set_alignment(CellAlignment::Right)
}

pub fn build_events_table(events: &[ConsumptionEvent]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Time", "Car", "Name", "Type", "Before", "After", "Consumed"]);
    for event in events {
        table.add_row(vec![
            Cell::new(event.timestamp.format("%b %d %H:%M")).add_attribute(Attribute::Dim),
            Cell::new(event.car_id).set_alignment(CellAlignment::Right),
            Cell::new(&event.car_name),
            Cell::new(event.model_type),
            liters(event.previous_fuel.0).add_attribute(Attribute::Dim),
            liters(event.current_fuel.0),
            liters(event.consumption.0).fg(Color::Red),
        ]);
    }
    table
}

pub fn build_summary_table(summary: &Summary) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    let overall = &summary.overall;
    table.add_row(vec![Cell::new("Total consumption, L"), liters(overall.total.0)]);
    table.add_row(vec![
        Cell::new("Events"),
        Cell::new(overall.n_events).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![Cell::new("Mean per event, L"), liters(overall.mean.0)]);
    table.add_row(vec![Cell::new("Median per event, L"), liters(overall.median.0)]);
    table.add_row(vec![Cell::new("Min per event, L"), liters(overall.min.0)]);
    table.add_row(vec![Cell::new("Max per event, L"), liters(overall.max.0)]);
    table.add_row(vec![Cell::new("Since"), Cell::new(summary.since.format("%Y-%m-%d %H:%M"))]);
    table.add_row(vec![Cell::new("Until"), Cell::new(summary.until.format("%Y-%m-%d %H:%M"))]);
    if let Some(liters_per_hour) = summary.liters_per_hour() {
        table.add_row(vec![Cell::new("Rate, L/h"), liters(liters_per_hour)]);
    }
    if let Some(mean_time_diff) = summary.mean_time_diff {
        table.add_row(vec![
            Cell::new("Mean time between readings"),
            Cell::new(format!("{:.1} min", mean_time_diff.as_seconds_f64() / 60.0))
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn build_breakdown_table(title: &str, breakdown: &[(String, Consumption)]) -> Table {
    let mut table = new_table();
    table.set_header(vec![title, "Total, L", "Events", "Mean, L", "Median, L"]);
    for (key, consumption) in breakdown {
        table.add_row(vec![
            Cell::new(key),
            liters(consumption.total.0),
            Cell::new(consumption.n_events).set_alignment(CellAlignment::Right),
            liters(consumption.mean.0),
            liters(consumption.median.0).add_attribute(Attribute::Dim),
        ]);
    }
    table
}

pub fn build_activity_table(activity: &Activity) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("Readings"), Cell::new(activity.n_readings)]);
    table.add_row(vec![Cell::new("Unique cars"), Cell::new(activity.n_cars)]);
    table.add_row(vec![Cell::new("Since"), Cell::new(activity.since.format("%Y-%m-%d %H:%M"))]);
    table.add_row(vec![Cell::new("Until"), Cell::new(activity.until.format("%Y-%m-%d %H:%M"))]);
    table.add_row(vec![Cell::new("Time span"), Cell::new(format_time_span(activity))]);
    table.add_row(vec![
        Cell::new("Availability"),
        Cell::new(format!(
            "{:.1}% ({}/{})",
            activity.availability_rate() * 100.0,
            activity.n_available,
            activity.n_readings,
        )),
    ]);
    table
}

fn format_time_span(activity: &Activity) -> String {
    let span = activity.until - activity.since;
    format!("{}d {}h {}m", span.num_days(), span.num_hours() % 24, span.num_minutes() % 60)
}

pub fn build_names_activity_table(activity: &Activity, limit: usize) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Name", "Readings", "Availability"]);
    for name in activity.per_name.iter().take(limit) {
        table.add_row(vec![
            Cell::new(&name.car_name),
            Cell::new(name.n_readings).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", name.availability_rate() * 100.0))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
        ]);
    }
    table
}

pub fn build_tracked_cars_table(activity: &Activity, limit: usize) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Car", "Name", "Readings"]);
    for car in activity.per_car.iter().take(limit) {
        table.add_row(vec![
            Cell::new(car.car_id).set_alignment(CellAlignment::Right),
            Cell::new(&car.car_name),
            Cell::new(car.n_readings).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn build_capacities_table(capacities: &Capacities) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Model", "Name", "Max fuel, L"]);
    for capacity in capacities.iter() {
        table.add_row(vec![
            Cell::new(capacity.model_id).set_alignment(CellAlignment::Right),
            Cell::new(&capacity.model_name),
            liters(capacity.max_fuel.0),
        ]);
    }
    table
}

pub fn build_readings_table(readings: &[Reading]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Car", "Name", "Type", "Fuel, %", "Fuel, L", "Available", "Location"]);
    for reading in readings {
        table.add_row(vec![
            Cell::new(reading.car_id).set_alignment(CellAlignment::Right),
            Cell::new(&reading.car_name),
            Cell::new(reading.model_type),
            Cell::new(reading.fuel_percent.0).set_alignment(CellAlignment::Right),
            liters(reading.fuel.0),
            Cell::new(if reading.available { "yes" } else { "no" }).fg(if reading.available {
                Color::Green
            } else {
                Color::DarkYellow
            }),
            Cell::new(reading.location.as_deref().unwrap_or_default())
                .add_attribute(Attribute::Dim),
        ]);
    }
    table
}
