use slotmap::new_key_type;

new_key_type! {
    /// Opaque identifier for an element stored in a document arena.
    pub struct ElementId;
}

new_key_type! {
    /// Identifier for a registered event listener.
    pub struct ListenerId;
}

new_key_type! {
    /// Identifier for one scroll-lock request.
    pub struct LockId;
}
