mod audit_trail;
mod outbox;
