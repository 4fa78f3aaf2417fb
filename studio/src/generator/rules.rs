//! Keyword rule tables
//!
//! Every table is evaluated top to bottom. Trigger and name tables stop at the
//! first match; action rules are tested independently.

use serde_json::json;

use crate::models::workflow::Node;

/// Labels attached to every parsed graph
pub const GENERATED_TAGS: [&str; 2] = ["voice-generated", "velo-studio"];

/// Title used when no name rule matches
pub const DEFAULT_NAME: &str = "Voice Generated Workflow";

/// A keyword rule producing a node template
pub struct NodeRule {
    /// Any of these substrings selects the rule
    pub keywords: &'static [&'static str],

    /// Node constructor taking the node ID and position
    pub build: fn(&str, [f64; 2]) -> Node,
}

impl NodeRule {
    /// Whether the lower-cased prompt contains one of the keywords
    pub fn matches(&self, lower_prompt: &str) -> bool {
        self.keywords.iter().any(|k| lower_prompt.contains(k))
    }
}

/// Triggers in priority order
pub static TRIGGER_RULES: [NodeRule; 2] = [
    NodeRule {
        keywords: &["typeform"],
        build: typeform_trigger,
    },
    NodeRule {
        keywords: &["razorpay", "payment"],
        build: payment_webhook,
    },
];

/// Fallback trigger
pub static MANUAL_TRIGGER: NodeRule = NodeRule {
    keywords: &[],
    build: manual_trigger,
};

/// Actions in append order
pub static ACTION_RULES: [NodeRule; 3] = [
    NodeRule {
        keywords: &["whatsapp"],
        build: whatsapp_message,
    },
    NodeRule {
        keywords: &["airtable"],
        build: airtable_append,
    },
    NodeRule {
        keywords: &["email", "gmail"],
        build: gmail_send,
    },
];

/// Workflow titles in priority order
pub static NAME_RULES: [(fn(&str) -> bool, &str); 3] = [
    (
        |p| p.contains("typeform") && p.contains("airtable"),
        "Typeform to Airtable Automation",
    ),
    (|p| p.contains("razorpay"), "Razorpay Payment Automation"),
    (|p| p.contains("email"), "Email Automation Workflow"),
];

fn typeform_trigger(id: &str, position: [f64; 2]) -> Node {
    Node::new(id, "Typeform Trigger", "n8n-nodes-base.typeformTrigger", position).with_parameters(
        json!({
            "formId": "YOUR_FORM_ID",
            "webhookUrl": "https://your-webhook-url.com"
        }),
    )
}

fn payment_webhook(id: &str, position: [f64; 2]) -> Node {
    Node::new(id, "Razorpay Webhook", "n8n-nodes-base.webhook", position).with_parameters(json!({
        "path": "razorpay-webhook",
        "httpMethod": "POST"
    }))
}

fn manual_trigger(id: &str, position: [f64; 2]) -> Node {
    Node::new(id, "Manual Trigger", "n8n-nodes-base.manualTrigger", position)
}

fn whatsapp_message(id: &str, position: [f64; 2]) -> Node {
    Node::new(id, "Send WhatsApp", "n8n-nodes-base.httpRequest", position).with_parameters(json!({
        "url": "https://api.whatsapp.com/send",
        "method": "POST",
        "sendBody": true,
        "bodyParameters": {
            "phone": "={{ $json.phone }}",
            "message": "New submission received!"
        }
    }))
}

fn airtable_append(id: &str, position: [f64; 2]) -> Node {
    Node::new(id, "Add to Airtable", "n8n-nodes-base.airtable", position).with_parameters(json!({
        "operation": "append",
        "baseId": "YOUR_BASE_ID",
        "table": "Contacts",
        "fields": {
            "Name": "={{ $json.name }}",
            "Email": "={{ $json.email }}"
        }
    }))
}

fn gmail_send(id: &str, position: [f64; 2]) -> Node {
    Node::new(id, "Send Email", "n8n-nodes-base.gmail", position).with_parameters(json!({
        "operation": "send",
        "to": "={{ $json.email }}",
        "subject": "Thank you for your submission",
        "body": "We have received your submission and will get back to you soon."
    }))
}
