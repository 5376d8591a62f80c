use k8s_openapi::NamespaceResourceScope;
use kube::{Api, Client, Resource};

pub mod conditions;
pub mod operations;

pub trait GetApi {
    fn global_api<T>(&self) -> Api<T>
    where
        T: Resource<DynamicType = ()>;

    fn namespaced_api<T>(&self, namespace: &str) -> Api<T>
    where
        T: Resource<Scope = NamespaceResourceScope, DynamicType = ()>;
}

impl GetApi for Client {
    fn global_api<T>(&self) -> Api<T>
    where
        T: Resource<DynamicType = ()>,
    {
        Api::all(self.clone())
    }

    fn namespaced_api<T>(&self, namespace: &str) -> Api<T>
    where
        T: Resource<Scope = NamespaceResourceScope, DynamicType = ()>,
    {
        Api::namespaced(self.clone(), namespace)
    }
}
