/// Services professionals can offer, as listed on the signup form.
pub const SERVICE_CATALOG: &[&str] = &[
  "Construção Civil",
  "Arquitetura",
  "Marcenaria",
  "Reformas",
  "Paisagismo",
  "Acabamentos",
  "Design de Interiores",
  "Instalações Elétricas",
  "Instalações Hidráulicas",
];
