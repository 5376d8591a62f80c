use kube::Client;

pub struct ReconcilerContext {
    pub client: Client,
}
