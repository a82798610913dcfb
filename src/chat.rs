use crate::models::{ChatContext, UserRole};

const GREETING_KEYWORDS: &[&str] = &["hello", "hi", "hey", "good morning", "good afternoon"];
const STUDENT_BALANCE_KEYWORDS: &[&str] = &["fee", "balance", "due"];
const ADMIN_COLLECTION_KEYWORDS: &[&str] = &["collection", "revenue", "fee"];
const ADMIN_DEFAULTER_KEYWORDS: &[&str] = &["defaulter", "overdue"];
const PAYMENT_KEYWORDS: &[&str] = &["payment", "pay"];
const RECEIPT_KEYWORDS: &[&str] = &["receipt", "invoice"];
const REMINDER_KEYWORDS: &[&str] = &["remind", "notification"];

const FALLBACK_REPLY: &str = "I did not catch that. Ask me about fees, payments, \
receipts or reminders and I will point you to the right place.";

fn matches_any(query: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| query.contains(k))
}

/// Resolve a chat message to a canned reply. Branches are layered and the
/// first hit wins: greetings, then role-gated intents, then role-agnostic
/// intents, then the fallback. "fee" appears in both the student and the
/// admin branch, so the caller's role decides which reply it lands on; a
/// greeting always beats a keyword.
pub fn resolve_chat(query: &str, ctx: &ChatContext) -> String {
    let q = query.to_lowercase();

    if matches_any(&q, GREETING_KEYWORDS) {
        return format!("Hello {}! How can I help you today?", ctx.name);
    }

    match ctx.role {
        UserRole::Student => {
            if matches_any(&q, STUDENT_BALANCE_KEYWORDS) {
                return "Your fee summary is on the dashboard under My Fees; it shows \
                        the balance and the next due date."
                    .to_string();
            }
        }
        UserRole::Admin | UserRole::SuperAdmin => {
            if matches_any(&q, ADMIN_COLLECTION_KEYWORDS) {
                return "Collection numbers are on the dashboard; ask the reports page \
                        for a class-wise or month-wise break-up."
                    .to_string();
            }
            if matches_any(&q, ADMIN_DEFAULTER_KEYWORDS) {
                return "The defaulter list is under Reports > Defaulters, sorted by \
                        outstanding balance."
                    .to_string();
            }
        }
        UserRole::Staff | UserRole::Parent => {}
    }

    if matches_any(&q, PAYMENT_KEYWORDS) {
        return "Payments are accepted as cash, online transfer or cheque; online \
                payments reflect immediately."
            .to_string();
    }
    if matches_any(&q, RECEIPT_KEYWORDS) {
        return "Receipts are generated for every completed payment and can be \
                downloaded from the payment history."
            .to_string();
    }
    if matches_any(&q, REMINDER_KEYWORDS) {
        return "Reminders go out automatically over WhatsApp, SMS or email depending \
                on how close the due date is."
            .to_string();
    }

    FALLBACK_REPLY.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: UserRole, name: &str) -> ChatContext {
        ChatContext {
            role,
            name: name.to_string(),
        }
    }

    #[test]
    fn greeting_wins_over_everything() {
        let reply = resolve_chat("Hi, what is my fee balance?", &ctx(UserRole::Student, "Avni"));
        assert_eq!(reply, "Hello Avni! How can I help you today?");
    }

    #[test]
    fn fee_keyword_is_role_gated() {
        let student = resolve_chat("what is my fee balance", &ctx(UserRole::Student, "Avni"));
        assert!(student.contains("My Fees"));

        let admin = resolve_chat("how is fee collection going", &ctx(UserRole::Admin, "Priya"));
        assert!(admin.contains("Collection numbers"));

        let super_admin = resolve_chat("fee collection status", &ctx(UserRole::SuperAdmin, "Priya"));
        assert!(super_admin.contains("Collection numbers"));
    }

    #[test]
    fn admin_defaulter_branch_is_checked_after_collection() {
        let reply = resolve_chat("who is overdue", &ctx(UserRole::Admin, "Priya"));
        assert!(reply.contains("defaulter list"));
    }

    #[test]
    fn staff_and_parent_fall_through_to_shared_intents() {
        let staff = resolve_chat("how do I record a payment", &ctx(UserRole::Staff, "Kabir"));
        assert!(staff.contains("cash, online transfer or cheque"));

        let parent = resolve_chat("where is the receipt", &ctx(UserRole::Parent, "Sunita"));
        assert!(parent.contains("Receipts"));
    }

    #[test]
    fn reminder_keyword_hits_the_shared_branch() {
        let reply = resolve_chat("when do reminders go out", &ctx(UserRole::Parent, "Sunita"));
        assert!(reply.contains("WhatsApp, SMS or email"));
    }

    #[test]
    fn unknown_messages_get_the_fallback() {
        assert_eq!(
            resolve_chat("tell me a joke", &ctx(UserRole::Staff, "Kabir")),
            FALLBACK_REPLY
        );
    }
}
