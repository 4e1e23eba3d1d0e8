#![allow(dead_code)]

use httpmock::MockServer;
use parte::Config;
use serde_json::{Value, json};

pub const DATABASE_ID: &str = "db-main";
pub const TOKEN: &str = "secret_test";
pub const AUTHOR: &str = "Lucía";

pub fn config(server: &MockServer) -> Config {
    Config::new(AUTHOR, TOKEN, DATABASE_ID).with_base_url(server.base_url())
}

pub fn list(results: Vec<Value>, next_cursor: Option<&str>) -> Value {
    json!({
        "object": "list",
        "results": results,
        "has_more": next_cursor.is_some(),
        "next_cursor": next_cursor,
    })
}

fn text(value: &str) -> Value {
    if value.is_empty() {
        json!({"type": "rich_text", "rich_text": []})
    } else {
        json!({"type": "rich_text", "rich_text": [{"type": "text", "plain_text": value}]})
    }
}

fn select(name: &str) -> Value {
    if name.is_empty() {
        json!({"type": "select", "select": null})
    } else {
        json!({"type": "select", "select": {"id": "opt", "name": name, "color": "default"}})
    }
}

pub fn report_page(
    id: &str,
    day: &str,
    shift: &str,
    colleagues: &[&str],
    comments: &str,
) -> Value {
    let colleagues: Vec<Value> = colleagues.iter().map(|name| json!({"name": name})).collect();
    json!({
        "object": "page",
        "id": id,
        "properties": {
            "Día": {"id": "d", "type": "date", "date": {"start": day, "end": null}},
            "Horario": select(shift),
            "Compañeros": {"id": "c", "type": "multi_select", "multi_select": colleagues},
            "Comentarios importantes": text(comments),
        }
    })
}

pub fn visit(id: &str, impression: &str) -> Value {
    json!({
        "object": "page",
        "id": id,
        "properties": {
            "Tipo": select("Visita"),
            "Impresión": text(impression),
        }
    })
}

pub fn entry(
    id: &str,
    name: &str,
    yard: &str,
    state: &str,
    observations: &str,
    important: &str,
) -> Value {
    json!({
        "object": "page",
        "id": id,
        "properties": {
            "Tipo": select("Animal"),
            "Nombre": {"id": "title", "type": "title", "title": [{"plain_text": name}]},
            "Patio": select(yard),
            "Estado": select(state),
            "Observaciones": text(observations),
            "Importante": text(important),
        }
    })
}

pub fn child_database(id: &str) -> Value {
    json!({"object": "block", "id": id, "type": "child_database", "child_database": {"title": "Animales"}})
}

pub fn paragraph(id: &str) -> Value {
    json!({"object": "block", "id": id, "type": "paragraph", "paragraph": {"rich_text": []}})
}
