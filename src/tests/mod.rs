// Integration tests - cross-module scenarios and invariants

mod lifecycle;
